use itertools::iproduct;

use urbanpar::{multiply, Matrix, Pipeline};
use urbanpar_gen::{ElementGenerator, MatrixBuilder};

#[test]
fn identity_is_neutral()
{
    let pipeline = Pipeline::new(4).unwrap();
    for n in [1, 2, 5, 17] {
        let a = MatrixBuilder::square(n).build::<i64>();
        let eye = Matrix::eye(n);
        assert_eq!(multiply(&a, &eye).unwrap(), a);
        assert_eq!(pipeline.multiply(&a, &eye).unwrap(), a);
        assert_eq!(pipeline.multiply(&eye, &a).unwrap(), a);
    }
}

#[test]
fn ones_times_ones_is_n()
{
    let pipeline = Pipeline::new(3).unwrap();
    for n in [1, 4, 33, 200] {
        let ones = MatrixBuilder::square(n)
            .generator(ElementGenerator::Ones)
            .build::<i32>();
        let c = pipeline.multiply(&ones, &ones).unwrap();
        assert_eq!(c.dim(), (n, n));
        assert!(c.as_slice().iter().all(|&x| x == n as i32));
    }
}

#[test]
fn parallel_matches_sequential()
{
    for (workers, (m, k, n)) in iproduct!([1, 2, 5, 64], [(3, 4, 5), (16, 16, 16), (40, 7, 1)]) {
        let pipeline = Pipeline::new(workers).unwrap();
        let a = MatrixBuilder::new((m, k)).build::<i64>();
        let b = MatrixBuilder::new((k, n))
            .generator(ElementGenerator::Banded(7))
            .build::<i64>();
        assert_eq!(
            pipeline.multiply(&a, &b).unwrap(),
            multiply(&a, &b).unwrap(),
            "workers = {}, shape = {:?}",
            workers,
            (m, k, n)
        );
    }
}

#[test]
fn known_product()
{
    let a = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let b = Matrix::from_rows(vec![vec![7, 8], vec![9, 10], vec![11, 12]]).unwrap();
    let c = Pipeline::new(2).unwrap().multiply(&a, &b).unwrap();
    assert_eq!(c, Matrix::from_rows(vec![vec![58, 64], vec![139, 154]]).unwrap());
}
