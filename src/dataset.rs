// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Named datasets filled by pipeline runs.

use std::ops::Index;

use crate::error::{length_mismatch, size_of_shape_checked, Error, Result};

/// A named, fixed-length sequence of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset<A> {
    name: String,
    data: Vec<A>,
}

impl<A> Dataset<A> {
    /// Create a dataset of `len` copies of `elem`.
    pub fn from_elem(name: impl Into<String>, len: usize, elem: A) -> Self
    where A: Clone
    {
        Dataset { name: name.into(), data: vec![elem; len] }
    }

    /// Create a dataset of `len` default values.
    pub fn new(name: impl Into<String>, len: usize) -> Self
    where A: Clone + Default
    {
        Self::from_elem(name, len, A::default())
    }

    pub fn from_vec(name: impl Into<String>, data: Vec<A>) -> Self
    {
        Dataset { name: name.into(), data }
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn len(&self) -> usize
    {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[A]
    {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A>
    {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<A>
    {
        self.data
    }

    /// Swap in a fully gathered buffer of the same length.
    pub(crate) fn replace(&mut self, data: Vec<A>) -> Result<()>
    {
        if data.len() != self.data.len() {
            return Err(length_mismatch(self.data.len(), data.len()));
        }
        self.data = data;
        Ok(())
    }
}

impl<A> Index<usize> for Dataset<A> {
    type Output = A;

    fn index(&self, index: usize) -> &A
    {
        &self.data[index]
    }
}

impl<'a, A> IntoIterator for &'a Dataset<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.data.iter()
    }
}

/// A named flat buffer holding `len` records of `width` fields each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSet<A> {
    name: String,
    width: usize,
    data: Vec<A>,
}

impl<A> RecordSet<A> {
    /// Create `len` records of `width` copies of `elem`.
    pub fn from_elem(name: impl Into<String>, len: usize, width: usize, elem: A) -> Result<Self>
    where A: Clone
    {
        if width == 0 {
            return Err(Error::RecordWidth { len: 0, width });
        }
        let size = size_of_shape_checked(len, width)?;
        Ok(RecordSet { name: name.into(), width, data: vec![elem; size] })
    }

    /// Wrap an existing flat buffer; its length must be a multiple of `width`.
    pub fn from_flat(name: impl Into<String>, data: Vec<A>, width: usize) -> Result<Self>
    {
        if width == 0 || data.len() % width != 0 {
            return Err(Error::RecordWidth { len: data.len(), width });
        }
        Ok(RecordSet { name: name.into(), width, data })
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Number of records.
    pub fn len(&self) -> usize
    {
        self.data.len() / self.width
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    pub fn width(&self) -> usize
    {
        self.width
    }

    /// The record at `index`.
    ///
    /// **Panics** if `index` is out of bounds.
    pub fn record(&self, index: usize) -> &[A]
    {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    pub fn records(&self) -> std::slice::ChunksExact<'_, A>
    {
        self.data.chunks_exact(self.width)
    }

    pub fn as_flat(&self) -> &[A]
    {
        &self.data
    }

    pub(crate) fn replace(&mut self, data: Vec<A>) -> Result<()>
    {
        if data.len() != self.data.len() {
            return Err(length_mismatch(self.data.len(), data.len()));
        }
        self.data = data;
        Ok(())
    }
}

/// Two equal-length sequences that are always filled and gathered together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairedDataset<A, B> {
    name: String,
    first: Dataset<A>,
    second: Dataset<B>,
}

impl<A, B> PairedDataset<A, B> {
    /// Pair two datasets; fails unless their lengths agree.
    pub fn new(name: impl Into<String>, first: Dataset<A>, second: Dataset<B>) -> Result<Self>
    {
        if first.len() != second.len() {
            return Err(length_mismatch(first.len(), second.len()));
        }
        Ok(PairedDataset { name: name.into(), first, second })
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn len(&self) -> usize
    {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.first.is_empty()
    }

    pub fn first(&self) -> &Dataset<A>
    {
        &self.first
    }

    pub fn second(&self) -> &Dataset<B>
    {
        &self.second
    }

    /// Iterate over both sequences in lock step.
    pub fn iter(&self) -> impl Iterator<Item = (&A, &B)> + '_
    {
        self.first.iter().zip(self.second.iter())
    }

    pub fn into_parts(self) -> (Dataset<A>, Dataset<B>)
    {
        (self.first, self.second)
    }

    /// Replace both halves, or neither.
    pub(crate) fn replace(&mut self, first: Vec<A>, second: Vec<B>) -> Result<()>
    {
        let len = self.len();
        if first.len() != len {
            return Err(length_mismatch(len, first.len()));
        }
        if second.len() != len {
            return Err(length_mismatch(len, second.len()));
        }
        self.first.data = first;
        self.second.data = second;
        Ok(())
    }
}
