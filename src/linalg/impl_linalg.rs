// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{incompatible_shapes, size_of_shape_checked, Error, Result};
use crate::linalg::Matrix;
use crate::pipeline::Pipeline;
use crate::split_at::split_records_mut;
use crate::LinalgScalar;

/// Matrix multiplication `a × b`, computed on the calling thread.
///
/// If `a` is *M* × *K*, then `b` must be *K* × *N* and the result is *M* × *N*.
///
/// **Errors** with `IncompatibleShapes` if the inner dimensions differ, and
/// with `Overflow` if the product has too many elements.
///
/// ```
/// use urbanpar::{multiply, Matrix};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// let c = multiply(&a, &b).unwrap();
/// assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
/// ```
pub fn multiply<A>(a: &Matrix<A>, b: &Matrix<A>) -> Result<Matrix<A>>
where A: LinalgScalar
{
    let (m, n) = conformable(a, b)?;
    let mut c = Matrix::zeros((m, n));
    if c.is_empty() {
        return Ok(c);
    }
    for (i, row) in c.as_mut_slice().chunks_exact_mut(n).enumerate() {
        mat_mul_row(a, b, i, row);
    }
    Ok(c)
}

impl Pipeline {
    /// Parallel matrix multiplication `a × b`.
    ///
    /// The rows of the result are partitioned over the workers the same way
    /// datasets are; every worker owns its block of rows exclusively. Each
    /// cell is fully accumulated over `k` before it is stored, and the result
    /// is only returned once all workers are done.
    ///
    /// Empty operands give an empty result without involving any worker.
    pub fn multiply<A>(&self, a: &Matrix<A>, b: &Matrix<A>) -> Result<Matrix<A>>
    where A: LinalgScalar
    {
        let (m, n) = conformable(a, b)?;
        let mut c = Matrix::zeros((m, n));
        if c.is_empty() {
            debug!(rows = m, cols = n, "empty matrix product");
            return Ok(c);
        }
        debug!(rows = m, cols = n, inner = a.ncols(), workers = self.workers(), "matrix product");
        let pieces = split_records_mut(c.as_mut_slice(), n, self.workers())?;
        let completed = self.install(|stop| {
            pieces
                .into_par_iter()
                .with_max_len(1)
                .map(|(p, block)| {
                    for (offset, row) in block.chunks_exact_mut(n).enumerate() {
                        if stop.is_stopped() {
                            return false;
                        }
                        mat_mul_row(a, b, p.start + offset, row);
                    }
                    true
                })
                .reduce(|| true, |x, y| x && y)
        });
        if !completed {
            return Err(Error::Aborted("matrix product".to_owned()));
        }
        Ok(c)
    }
}

/// Check `a × b` is defined and return the shape of the product.
fn conformable<A>(a: &Matrix<A>, b: &Matrix<A>) -> Result<(usize, usize)>
{
    if a.ncols() != b.nrows() {
        return Err(incompatible_shapes(a.dim(), b.dim()));
    }
    let (m, n) = (a.nrows(), b.ncols());
    size_of_shape_checked(m, n)?;
    Ok((m, n))
}

/// Compute row `i` of `lhs × rhs` into `out`.
#[inline]
fn mat_mul_row<A>(lhs: &Matrix<A>, rhs: &Matrix<A>, i: usize, out: &mut [A])
where A: LinalgScalar
{
    let n = rhs.ncols();
    let lrow = lhs.row(i);
    let r = rhs.as_slice();
    for (j, elt) in out.iter_mut().enumerate() {
        *elt = lrow
            .iter()
            .enumerate()
            .fold(A::zero(), |s, (x, &l)| s + l * r[x * n + j]);
    }
}
