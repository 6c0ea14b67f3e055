// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_traits::{One, Zero};

use crate::error::{incompatible_shapes, size_of_shape_checked, Result};

macro_rules! size_checked_unwrap {
    ($rows:expr, $cols:expr) => {
        match size_of_shape_checked($rows, $cols) {
            Ok(sz) => sz,
            Err(_) => panic!("urbanpar: Shape too large, number of elements overflows isize"),
        }
    };
}

/// A dense, row-major two-dimensional matrix.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Matrix<A> {
    rows: usize,
    cols: usize,
    data: Vec<A>,
}

impl<A> Matrix<A> {
    /// Create a `rows × cols` matrix with every element `elem`.
    ///
    /// **Panics** if the number of elements overflows `isize`.
    pub fn from_elem((rows, cols): (usize, usize), elem: A) -> Self
    where A: Clone
    {
        let size = size_checked_unwrap!(rows, cols);
        Matrix { rows, cols, data: vec![elem; size] }
    }

    pub fn zeros(shape: (usize, usize)) -> Self
    where A: Clone + Zero
    {
        Self::from_elem(shape, A::zero())
    }

    pub fn ones(shape: (usize, usize)) -> Self
    where A: Clone + One
    {
        Self::from_elem(shape, A::one())
    }

    /// Create an identity matrix of size `n` (square).
    ///
    /// ```
    /// use urbanpar::Matrix;
    ///
    /// let eye = Matrix::<i32>::eye(2);
    /// assert_eq!(eye.as_slice(), &[1, 0, 0, 1]);
    /// ```
    pub fn eye(n: usize) -> Self
    where A: Clone + Zero + One
    {
        let mut m = Self::zeros((n, n));
        for i in 0..n {
            m[(i, i)] = A::one();
        }
        m
    }

    /// Create a matrix from a row-major vector.
    ///
    /// **Errors** if the shape overflows or `data` does not hold exactly
    /// `rows * cols` elements.
    pub fn from_shape_vec((rows, cols): (usize, usize), data: Vec<A>) -> Result<Self>
    {
        if size_of_shape_checked(rows, cols)? != data.len() {
            return Err(incompatible_shapes((rows, cols), (data.len(), 1)));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Create a matrix from nested rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<A>>) -> Result<Self>
    {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(size_of_shape_checked(nrows, ncols)?);
        for row in rows {
            if row.len() != ncols {
                return Err(incompatible_shapes((nrows, ncols), (1, row.len())));
            }
            data.extend(row);
        }
        Ok(Matrix { rows: nrows, cols: ncols, data })
    }

    /// Create a matrix by calling `f(i, j)` for every cell, in row-major order.
    ///
    /// **Panics** if the number of elements overflows `isize`.
    pub fn from_shape_fn<F>((rows, cols): (usize, usize), mut f: F) -> Self
    where F: FnMut(usize, usize) -> A
    {
        let mut data = Vec::with_capacity(size_checked_unwrap!(rows, cols));
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Matrix { rows, cols, data }
    }

    pub fn nrows(&self) -> usize
    {
        self.rows
    }

    pub fn ncols(&self) -> usize
    {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize)
    {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    pub fn is_square(&self) -> bool
    {
        self.rows == self.cols
    }

    pub fn get(&self, (i, j): (usize, usize)) -> Option<&A>
    {
        if i < self.rows && j < self.cols {
            self.data.get(i * self.cols + j)
        } else {
            None
        }
    }

    /// Return row `index`.
    ///
    /// **Panics** if `index` is out of bounds.
    pub fn row(&self, index: usize) -> &[A]
    {
        assert!(index < self.rows, "row index {} out of bounds", index);
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[A]
    {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [A]
    {
        &mut self.data
    }

    pub fn into_raw_vec(self) -> Vec<A>
    {
        self.data
    }
}

impl<A> Index<(usize, usize)> for Matrix<A> {
    type Output = A;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &A
    {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of bounds", i, j);
        &self.data[i * self.cols + j]
    }
}

impl<A> IndexMut<(usize, usize)> for Matrix<A> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut A
    {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of bounds", i, j);
        &mut self.data[i * self.cols + j]
    }
}

impl<A: fmt::Debug> fmt::Debug for Matrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Matrix")
            .field("shape", &(self.rows, self.cols))
            .field("rows", &self.data.chunks(self.cols.max(1)).collect::<Vec<_>>())
            .finish()
    }
}
