// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Contiguous partitioning of an index space across workers.

use std::ops::Range;

use crate::error::{Error, Result};

/// A half-open index range `[start, end)` owned by one worker.
///
/// Partitions are only created by [`partition`] and [`partitions`], so
/// `start <= end` always holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPartition"))]
pub struct Partition {
    pub(crate) worker: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Partition {
    /// Index of the owning worker.
    #[inline]
    pub fn worker(&self) -> usize
    {
        self.worker
    }

    /// First index of the partition.
    #[inline]
    pub fn start(&self) -> usize
    {
        self.start
    }

    /// One past the last index of the partition.
    #[inline]
    pub fn end(&self) -> usize
    {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize
    {
        debug_assert!(self.start <= self.end);
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.start == self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize>
    {
        self.start..self.end
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool
    {
        self.start <= index && index < self.end
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPartition {
    worker: usize,
    start: usize,
    end: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPartition> for Partition {
    type Error = String;

    fn try_from(raw: RawPartition) -> std::result::Result<Self, String>
    {
        if raw.start > raw.end {
            return Err(format!("partition start {} is past its end {}", raw.start, raw.end));
        }
        Ok(Partition { worker: raw.worker, start: raw.start, end: raw.end })
    }
}

/// Compute the partition of `len` elements owned by `worker` out of `workers`.
///
/// Every worker gets `len / workers` elements, the last one also takes the
/// remainder. With more workers than elements all but the last partition
/// are empty.
///
/// ```
/// use urbanpar::partition;
///
/// let p = partition(10, 3, 2).unwrap();
/// assert_eq!((p.start(), p.end()), (6, 10));
/// ```
pub fn partition(len: usize, workers: usize, worker: usize) -> Result<Partition>
{
    if workers == 0 {
        return Err(Error::InvalidWorkerCount(workers));
    }
    if worker >= workers {
        return Err(Error::WorkerOutOfRange { index: worker, workers });
    }
    Ok(partition_unchecked(len, workers, worker))
}

#[inline]
fn partition_unchecked(len: usize, workers: usize, worker: usize) -> Partition
{
    let chunk = len / workers;
    let start = worker * chunk;
    let end = if worker == workers - 1 { len } else { start + chunk };
    Partition { worker, start, end }
}

/// All partitions of `len` elements over `workers`, in worker order.
pub fn partitions(len: usize, workers: usize) -> Result<Partitions>
{
    if workers == 0 {
        return Err(Error::InvalidWorkerCount(workers));
    }
    Ok(Partitions { len, workers, next: 0 })
}

/// Iterator over the partitions of an index space.
///
/// Created by [`partitions`].
#[derive(Clone, Debug)]
pub struct Partitions {
    len: usize,
    workers: usize,
    next: usize,
}

impl Partitions {
    /// Number of elements being partitioned.
    pub fn total_len(&self) -> usize
    {
        self.len
    }

    pub fn workers(&self) -> usize
    {
        self.workers
    }
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition>
    {
        if self.next >= self.workers {
            return None;
        }
        let p = partition_unchecked(self.len, self.workers, self.next);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>)
    {
        let n = self.workers - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Partitions {}
