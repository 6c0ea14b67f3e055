// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::{length_mismatch, Result};
use crate::partition::Partition;

/// The values one worker produced for its partition; its send buffer.
#[must_use]
#[derive(Debug)]
pub(crate) struct Chunk<A> {
    pub(crate) partition: Partition,
    pub(crate) values: Vec<A>,
}

impl<A> Chunk<A> {
    pub(crate) fn new(partition: Partition, values: Vec<A>) -> Self
    {
        Chunk { partition, values }
    }
}

/// Assemble chunks into a fresh receive buffer of `len` units of `width`
/// elements, placing each chunk at its partition offset.
///
/// Chunks may arrive in any order. They must cover `[0, len)` exactly once.
pub(crate) fn gather<A>(len: usize, width: usize, mut chunks: Vec<Chunk<A>>) -> Result<Vec<A>>
{
    chunks.sort_by_key(|c| (c.partition.start, c.partition.end));
    let mut out = Vec::with_capacity(len * width);
    let mut offset = 0;
    for chunk in chunks {
        let p = chunk.partition;
        if p.start != offset {
            return Err(length_mismatch(offset, p.start));
        }
        if chunk.values.len() != p.len() * width {
            return Err(length_mismatch(p.len() * width, chunk.values.len()));
        }
        out.extend(chunk.values);
        offset = p.end;
    }
    if offset != len {
        return Err(length_mismatch(len, offset));
    }
    debug_assert_eq!(out.len(), len * width);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partitions;

    fn chunks_of(len: usize, workers: usize) -> Vec<Chunk<usize>>
    {
        partitions(len, workers)
            .unwrap()
            .map(|p| Chunk::new(p, p.range().collect()))
            .collect()
    }

    #[test]
    fn gather_reorders_by_offset()
    {
        let mut chunks = chunks_of(10, 3);
        chunks.reverse();
        assert_eq!(gather(10, 1, chunks).unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn gather_rejects_gap()
    {
        let mut chunks = chunks_of(10, 3);
        chunks.remove(1);
        assert!(gather(10, 1, chunks).is_err());
    }

    #[test]
    fn gather_rejects_short_chunk()
    {
        let mut chunks = chunks_of(10, 3);
        chunks[2].values.pop();
        assert!(gather(10, 1, chunks).is_err());
    }

    #[test]
    fn gather_empty()
    {
        let chunks = chunks_of(0, 4);
        assert!(gather(0, 1, chunks).unwrap().is_empty());
    }
}
