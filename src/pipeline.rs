// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The partition / fill / gather pipeline.
//!
//! A [`Pipeline`] owns a pool of exactly `W` worker threads. Each run splits
//! its dataset into `W` contiguous partitions with [`partition`](crate::partition()),
//! lets every worker fill its own partition into a private send buffer, waits
//! for all of them, and then gathers the buffers in index order into a fresh
//! receive buffer. Only when every partition completed is the dataset
//! replaced and the collector invoked, exactly once.
//!
//! ```
//! use urbanpar::{Dataset, Pipeline};
//!
//! let pipeline = Pipeline::new(3).unwrap();
//! let mut squares = Dataset::new("squares", 10);
//! let total: u64 = pipeline
//!     .run(&mut squares, |i| (i * i) as u64, |d| d.iter().sum())
//!     .unwrap();
//! assert_eq!(total, 285);
//! assert_eq!(squares[9], 81);
//! ```

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::dataset::{Dataset, PairedDataset, RecordSet};
use crate::error::{BoxError, Error, ErrorKind, Result};
use crate::gather::{gather, Chunk};
use crate::partition::{partitions, Partition};
use crate::split_at::{split_along, Records};

/// Cloneable handle through which the coordinator aborts pipeline runs.
///
/// Once aborted, every in-flight run stops at its next element and fails
/// with [`ErrorKind::Aborted`]; no collector fires until [`reset`](Self::reset).
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn abort(&self)
    {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self)
    {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool
    {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Builder for a [`Pipeline`].
#[derive(Clone, Debug)]
pub struct PipelineBuilder {
    workers: usize,
    thread_prefix: String,
}

impl Default for PipelineBuilder {
    fn default() -> Self
    {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        PipelineBuilder {
            workers,
            thread_prefix: "urbanpar-worker".to_owned(),
        }
    }
}

impl PipelineBuilder {
    pub fn workers(mut self, workers: usize) -> Self
    {
        self.workers = workers;
        self
    }

    pub fn thread_prefix(mut self, prefix: impl Into<String>) -> Self
    {
        self.thread_prefix = prefix.into();
        self
    }

    pub fn build(self) -> Result<Pipeline>
    {
        if self.workers == 0 {
            return Err(Error::InvalidWorkerCount(self.workers));
        }
        let prefix = self.thread_prefix;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(move |i| format!("{}-{}", prefix, i))
            .build()?;
        debug!(workers = self.workers, "built worker pool");
        Ok(Pipeline {
            workers: self.workers,
            pool,
            abort: AbortHandle::default(),
        })
    }
}

/// A fixed-size pool of workers running partition / fill / gather cycles.
#[derive(Debug)]
pub struct Pipeline {
    workers: usize,
    pool: rayon::ThreadPool,
    abort: AbortHandle,
}

/// Why a worker stopped before finishing its partition.
enum WorkerError {
    Halted,
    Failed(BoxError),
}

/// Stop signal observed by workers between elements.
pub(crate) struct Stop<'a> {
    abort: &'a AbortHandle,
    sibling_failed: &'a AtomicBool,
}

impl Stop<'_> {
    #[inline]
    fn check(&self) -> std::result::Result<(), WorkerError>
    {
        if self.abort.is_aborted() || self.sibling_failed.load(Ordering::Relaxed) {
            Err(WorkerError::Halted)
        } else {
            Ok(())
        }
    }

    #[inline]
    pub(crate) fn is_stopped(&self) -> bool
    {
        self.check().is_err()
    }
}

impl Pipeline {
    /// Create a pipeline with `workers` worker threads.
    pub fn new(workers: usize) -> Result<Self>
    {
        PipelineBuilder::default().workers(workers).build()
    }

    pub fn builder() -> PipelineBuilder
    {
        PipelineBuilder::default()
    }

    /// Number of workers, `W`.
    pub fn workers(&self) -> usize
    {
        self.workers
    }

    /// A handle that aborts runs of this pipeline.
    pub fn abort_handle(&self) -> AbortHandle
    {
        self.abort.clone()
    }

    /// Fill `dataset` with `fill(i)` at every index `i`, then call `collect`
    /// on the assembled dataset and return its result.
    pub fn run<A, F, C, R>(&self, dataset: &mut Dataset<A>, fill: F, collect: C) -> Result<R>
    where
        A: Send,
        F: Fn(usize) -> A + Sync,
        C: FnOnce(&Dataset<A>) -> R,
    {
        self.try_run(
            dataset,
            |i| Ok::<_, Infallible>(fill(i)),
            |d| Ok::<_, Infallible>(collect(d)),
        )
    }

    /// Fallible version of [`run`](Self::run).
    ///
    /// If any call to `fill` fails, the whole run fails: the other workers
    /// stop early, `dataset` keeps its previous contents and `collect` is
    /// never called.
    pub fn try_run<A, F, E, C, R, E2>(&self, dataset: &mut Dataset<A>, fill: F, collect: C) -> Result<R>
    where
        A: Send,
        F: Fn(usize) -> std::result::Result<A, E> + Sync,
        E: Into<BoxError>,
        C: FnOnce(&Dataset<A>) -> std::result::Result<R, E2>,
        E2: Into<BoxError>,
    {
        let name = dataset.name().to_owned();
        let len = dataset.len();
        let pieces: Vec<(Partition, ())> = partitions(len, self.workers)?.map(|p| (p, ())).collect();
        let chunks = self.execute(&name, pieces, |p, (), stop| {
            let mut values = Vec::with_capacity(p.len());
            for i in p.range() {
                stop.check()?;
                values.push(fill(i).map_err(|e| WorkerError::Failed(e.into()))?);
            }
            Ok(values)
        })?;
        let data = gather(len, 1, chunks)?;
        self.ensure_not_aborted(&name)?;
        dataset.replace(data)?;
        collect_with(&name, collect(&*dataset))
    }

    /// Fill a set of fixed-width records.
    ///
    /// Partitions are taken over records, so every record is written by
    /// exactly one worker. `fill(i, record)` receives a copy of record `i`'s
    /// current fields and updates it in place.
    pub fn run_records<A, F, E, C, R, E2>(&self, records: &mut RecordSet<A>, fill: F, collect: C) -> Result<R>
    where
        A: Clone + Send + Sync,
        F: Fn(usize, &mut [A]) -> std::result::Result<(), E> + Sync,
        E: Into<BoxError>,
        C: FnOnce(&RecordSet<A>) -> std::result::Result<R, E2>,
        E2: Into<BoxError>,
    {
        let name = records.name().to_owned();
        let (len, width) = (records.len(), records.width());
        let parts = partitions(len, self.workers)?;
        let pieces = split_along(Records { data: records.as_flat(), width }, parts);
        let chunks = self.execute(&name, pieces, |p, current, stop| {
            let mut values = current.data.to_vec();
            for (offset, record) in values.chunks_exact_mut(width).enumerate() {
                stop.check()?;
                fill(p.start + offset, record).map_err(|e| WorkerError::Failed(e.into()))?;
            }
            Ok(values)
        })?;
        let data = gather(len, width, chunks)?;
        self.ensure_not_aborted(&name)?;
        records.replace(data)?;
        collect_with(&name, collect(&*records))
    }

    /// Fill both halves of a paired dataset with shared partition boundaries.
    ///
    /// Both sequences are gathered before `collect` fires; a failure on
    /// either half fails the run and leaves both untouched.
    pub fn run_paired<A, B, F, E, C, R, E2>(&self, pair: &mut PairedDataset<A, B>, fill: F, collect: C) -> Result<R>
    where
        A: Send,
        B: Send,
        F: Fn(usize) -> std::result::Result<(A, B), E> + Sync,
        E: Into<BoxError>,
        C: FnOnce(&PairedDataset<A, B>) -> std::result::Result<R, E2>,
        E2: Into<BoxError>,
    {
        let name = pair.name().to_owned();
        let len = pair.len();
        let pieces: Vec<(Partition, ())> = partitions(len, self.workers)?.map(|p| (p, ())).collect();
        let chunks = self.execute(&name, pieces, |p, (), stop| {
            let mut values = Vec::with_capacity(p.len());
            for i in p.range() {
                stop.check()?;
                values.push(fill(i).map_err(|e| WorkerError::Failed(e.into()))?);
            }
            Ok(values)
        })?;
        let (first, second): (Vec<A>, Vec<B>) = gather(len, 1, chunks)?.into_iter().unzip();
        self.ensure_not_aborted(&name)?;
        pair.replace(first, second)?;
        collect_with(&name, collect(&*pair))
    }

    /// Run `task` for every piece on the pool, one piece per worker, and
    /// wait for all of them.
    ///
    /// The first real failure wins over the halts it caused in sibling
    /// workers.
    fn execute<T, A, W>(&self, name: &str, pieces: Vec<(Partition, T)>, task: W) -> Result<Vec<Chunk<A>>>
    where
        T: Send,
        A: Send,
        W: Fn(Partition, T, &Stop<'_>) -> std::result::Result<Vec<A>, WorkerError> + Sync,
    {
        debug!(dataset = name, workers = self.workers, "starting run");
        let sibling_failed = AtomicBool::new(false);
        let results: Vec<Result<Chunk<A>>> = self.pool.install(|| {
            pieces
                .into_par_iter()
                .with_max_len(1)
                .map(|(p, input)| {
                    trace!(dataset = name, worker = p.worker, start = p.start, end = p.end, "filling partition");
                    let stop = Stop { abort: &self.abort, sibling_failed: &sibling_failed };
                    match task(p, input, &stop) {
                        Ok(values) => Ok(Chunk::new(p, values)),
                        Err(WorkerError::Halted) => Err(Error::Aborted(name.to_owned())),
                        Err(WorkerError::Failed(source)) => {
                            sibling_failed.store(true, Ordering::Relaxed);
                            Err(Error::WorkerFailed {
                                dataset: name.to_owned(),
                                worker: p.worker,
                                source,
                            })
                        }
                    }
                })
                .collect()
        });

        let mut chunks = Vec::with_capacity(results.len());
        let mut failure: Option<Error> = None;
        for result in results {
            match result {
                Ok(chunk) => chunks.push(chunk),
                Err(err) => {
                    let replace = match &failure {
                        None => true,
                        Some(f) => f.kind() == ErrorKind::Aborted && err.kind() != ErrorKind::Aborted,
                    };
                    if replace {
                        failure = Some(err);
                    }
                }
            }
        }
        if let Some(err) = failure {
            warn!(dataset = name, error = %err, "run failed");
            return Err(err);
        }
        debug!(dataset = name, chunks = chunks.len(), "all workers finished");
        Ok(chunks)
    }

    fn ensure_not_aborted(&self, name: &str) -> Result<()>
    {
        if self.abort.is_aborted() {
            warn!(dataset = name, "aborted before collect");
            return Err(Error::Aborted(name.to_owned()));
        }
        Ok(())
    }

    pub(crate) fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&Stop<'_>) -> R + Send,
        R: Send,
    {
        let no_failure = AtomicBool::new(false);
        let stop = Stop { abort: &self.abort, sibling_failed: &no_failure };
        self.pool.install(|| op(&stop))
    }
}

fn collect_with<R, E>(name: &str, result: std::result::Result<R, E>) -> Result<R>
where E: Into<BoxError>
{
    result.map_err(|e| Error::CollectFailed {
        dataset: name.to_owned(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_is_rejected()
    {
        assert_eq!(Pipeline::new(0).unwrap_err().kind(), ErrorKind::InvalidWorkerCount);
    }

    #[test]
    fn ten_over_three_in_order()
    {
        let pipeline = Pipeline::new(3).unwrap();
        let mut d = Dataset::new("seq", 10);
        let collected = pipeline.run(&mut d, |i| i, |d| d.as_slice().to_vec()).unwrap();
        assert_eq!(collected, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn more_workers_than_elements()
    {
        let pipeline = Pipeline::new(8).unwrap();
        let mut d = Dataset::new("tiny", 3);
        pipeline.run(&mut d, |i| i as i32 * 2, |_| ()).unwrap();
        assert_eq!(d.as_slice(), &[0, 2, 4]);
    }

    #[test]
    fn abort_prevents_collect()
    {
        let pipeline = Pipeline::new(2).unwrap();
        let handle = pipeline.abort_handle();
        handle.abort();
        let mut d = Dataset::from_elem("noise", 16, 30);
        let mut collected = false;
        let err = pipeline.run(&mut d, |i| i as i32, |_| collected = true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Aborted);
        assert!(!collected);
        assert!(d.iter().all(|&v| v == 30));

        handle.reset();
        pipeline.run(&mut d, |i| i as i32, |_| collected = true).unwrap();
        assert!(collected);
    }
}
