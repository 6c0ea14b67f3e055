// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::{Error, Result};
use crate::partition::{partitions, Partition, Partitions};

/// Buffers that can be split in two at an element index
pub(crate) trait SplitAt {
    fn split_at(self, index: usize) -> (Self, Self) where Self: Sized;
}

impl<'a, T> SplitAt for &'a mut [T] {
    #[inline]
    fn split_at(self, index: usize) -> (Self, Self)
    {
        self.split_at_mut(index)
    }
}

impl<'a, T> SplitAt for &'a [T] {
    #[inline]
    fn split_at(self, index: usize) -> (Self, Self)
    {
        <[T]>::split_at(self, index)
    }
}

/// A flat buffer viewed as whole records of `width` elements.
///
/// Splitting happens at record index granularity, so one record never ends
/// up on both sides of a split.
#[derive(Debug)]
pub(crate) struct Records<S> {
    pub(crate) data: S,
    pub(crate) width: usize,
}

impl<S: SplitAt> SplitAt for Records<S> {
    #[inline]
    fn split_at(self, index: usize) -> (Self, Self)
    {
        let width = self.width;
        let (a, b) = self.data.split_at(index * width);
        (Records { data: a, width }, Records { data: b, width })
    }
}

/// Split `data` front to back along `parts`, pairing each piece with its partition.
pub(crate) fn split_along<S: SplitAt>(data: S, parts: Partitions) -> Vec<(Partition, S)>
{
    let mut pieces = Vec::with_capacity(parts.len());
    let mut rest = Some(data);
    for p in parts {
        if let Some(tail) = rest.take() {
            let (head, tail) = tail.split_at(p.len());
            pieces.push((p, head));
            rest = Some(tail);
        }
    }
    pieces
}

/// Split a mutable slice into the `workers` disjoint partitions that cover it.
///
/// ```
/// use urbanpar::split_partitions_mut;
///
/// let mut data = [0; 10];
/// for (p, chunk) in split_partitions_mut(&mut data, 3).unwrap() {
///     chunk.fill(p.worker());
/// }
/// assert_eq!(data, [0, 0, 0, 1, 1, 1, 2, 2, 2, 2]);
/// ```
pub fn split_partitions_mut<T>(data: &mut [T], workers: usize) -> Result<Vec<(Partition, &mut [T])>>
{
    let parts = partitions(data.len(), workers)?;
    Ok(split_along(data, parts))
}

/// Split a mutable flat buffer of `width`-wide records into `workers`
/// partitions over records.
pub fn split_records_mut<T>(data: &mut [T], width: usize, workers: usize)
    -> Result<Vec<(Partition, &mut [T])>>
{
    if width == 0 || data.len() % width != 0 {
        return Err(Error::RecordWidth { len: data.len(), width });
    }
    let parts = partitions(data.len() / width, workers)?;
    Ok(split_along(Records { data, width }, parts)
        .into_iter()
        .map(|(p, r)| (p, r.data))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_covers_slice()
    {
        let mut data: Vec<usize> = (0..17).collect();
        let pieces = split_partitions_mut(&mut data, 4).unwrap();
        assert_eq!(pieces.len(), 4);
        for (p, chunk) in &pieces {
            assert_eq!(chunk.len(), p.len());
            assert_eq!(chunk.first().copied(), if p.is_empty() { None } else { Some(p.start) });
        }
        assert_eq!(pieces[3].1.len(), 5);
    }

    #[test]
    fn records_are_not_torn()
    {
        let mut flat: Vec<u8> = vec![0; 5 * 4];
        let pieces = split_records_mut(&mut flat, 4, 2).unwrap();
        assert_eq!(pieces[0].1.len(), 8);
        assert_eq!(pieces[1].1.len(), 12);
        assert!(pieces.iter().all(|(_, r)| r.len() % 4 == 0));
    }

    #[test]
    fn bad_record_width()
    {
        let mut flat = [0u8; 7];
        assert!(matches!(
            split_records_mut(&mut flat, 4, 2),
            Err(Error::RecordWidth { len: 7, width: 4 })
        ));
        assert!(split_records_mut(&mut flat, 0, 2).is_err());
    }
}
