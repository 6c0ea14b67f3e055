// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use urbanpar::Matrix;

use num_traits::Num;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixBuilder
{
    dim: (usize, usize),
    generator: ElementGenerator,
}

/// How to generate elements
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementGenerator
{
    /// 0, 1, 2, ... in row-major order
    Sequential,
    Zero,
    Ones,
    /// ones on the diagonal, zeros elsewhere
    Identity,
    /// `(i + j) % modulus`
    Banded(usize),
}

impl Default for MatrixBuilder
{
    fn default() -> Self
    {
        Self::new((0, 0))
    }
}

impl MatrixBuilder
{
    pub fn new(dim: (usize, usize)) -> Self
    {
        MatrixBuilder {
            dim,
            generator: ElementGenerator::Sequential,
        }
    }

    /// A square `n × n` builder.
    pub fn square(n: usize) -> Self
    {
        Self::new((n, n))
    }

    pub fn generator(mut self, generator: ElementGenerator) -> Self
    {
        self.generator = generator;
        self
    }

    pub fn build<T>(self) -> Matrix<T>
    where T: Num + Clone
    {
        let mut current = T::zero();
        let generator = self.generator;
        Matrix::from_shape_fn(self.dim, |i, j| match generator {
            ElementGenerator::Sequential => {
                let ret = current.clone();
                current = ret.clone() + T::one();
                ret
            }
            ElementGenerator::Zero => T::zero(),
            ElementGenerator::Ones => T::one(),
            ElementGenerator::Identity => {
                if i == j {
                    T::one()
                } else {
                    T::zero()
                }
            }
            ElementGenerator::Banded(modulus) => from_count((i + j) % modulus.max(1)),
        })
    }
}

fn from_count<T: Num + Clone>(n: usize) -> T
{
    (0..n).fold(T::zero(), |acc, _| acc + T::one())
}

#[test]
fn test_generators()
{
    let seq = MatrixBuilder::new((2, 3)).build::<i32>();
    assert_eq!(seq.as_slice(), &[0, 1, 2, 3, 4, 5]);

    let eye = MatrixBuilder::square(3)
        .generator(ElementGenerator::Identity)
        .build::<i64>();
    assert_eq!(eye, Matrix::eye(3));

    let banded = MatrixBuilder::square(2)
        .generator(ElementGenerator::Banded(2))
        .build::<u32>();
    assert_eq!(banded.as_slice(), &[0, 1, 1, 0]);
}
