// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error as StdError;

/// Boxed error returned by user supplied fill and collect functions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error from partitioning, a pipeline run, or a matrix product.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),

    #[error("worker index {index} out of range for {workers} workers")]
    WorkerOutOfRange { index: usize, workers: usize },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("record buffer of {len} elements can not hold records of width {width}")]
    RecordWidth { len: usize, width: usize },

    #[error("incompatible shapes: {lhs:?} and {rhs:?}")]
    IncompatibleShapes { lhs: (usize, usize), rhs: (usize, usize) },

    #[error("shape {rows}x{cols} is too large, number of elements overflows isize")]
    Overflow { rows: usize, cols: usize },

    #[error("worker {worker} failed filling `{dataset}`: {source}")]
    WorkerFailed {
        dataset: String,
        worker: usize,
        #[source]
        source: BoxError,
    },

    #[error("collector failed for `{dataset}`: {source}")]
    CollectFailed {
        dataset: String,
        #[source]
        source: BoxError,
    },

    #[error("run of `{0}` was aborted")]
    Aborted(String),

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Error code for an [`Error`].
///
/// This enumeration is not exhaustive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// zero workers requested
    InvalidWorkerCount,
    /// worker index not below the worker count
    WorkerOutOfRange,
    /// sequences that must agree in length do not
    LengthMismatch,
    /// flat buffer does not divide into whole records
    RecordWidth,
    /// non-conformable matrix operands
    IncompatibleShapes,
    /// overflow when computing the number of elements
    Overflow,
    /// a fill function failed on some worker
    WorkerFailed,
    /// the collector function failed
    CollectFailed,
    /// the run was aborted by the coordinator
    Aborted,
    /// the worker pool could not be created
    ThreadPool,
}

impl Error {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind
    {
        match self {
            Error::InvalidWorkerCount(_) => ErrorKind::InvalidWorkerCount,
            Error::WorkerOutOfRange { .. } => ErrorKind::WorkerOutOfRange,
            Error::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            Error::RecordWidth { .. } => ErrorKind::RecordWidth,
            Error::IncompatibleShapes { .. } => ErrorKind::IncompatibleShapes,
            Error::Overflow { .. } => ErrorKind::Overflow,
            Error::WorkerFailed { .. } => ErrorKind::WorkerFailed,
            Error::CollectFailed { .. } => ErrorKind::CollectFailed,
            Error::Aborted(_) => ErrorKind::Aborted,
            Error::ThreadPool(_) => ErrorKind::ThreadPool,
        }
    }

    /// Whether this error was raised before any work started.
    pub fn is_configuration(&self) -> bool
    {
        matches!(
            self.kind(),
            ErrorKind::InvalidWorkerCount
                | ErrorKind::WorkerOutOfRange
                | ErrorKind::LengthMismatch
                | ErrorKind::RecordWidth
                | ErrorKind::IncompatibleShapes
                | ErrorKind::Overflow
                | ErrorKind::ThreadPool
        )
    }
}

#[inline]
pub(crate) fn incompatible_shapes(lhs: (usize, usize), rhs: (usize, usize)) -> Error
{
    Error::IncompatibleShapes { lhs, rhs }
}

/// Number of elements of a `rows × cols` buffer, checking that it fits in
/// `isize` so that it can be allocated and indexed.
pub(crate) fn size_of_shape_checked(rows: usize, cols: usize) -> Result<usize>
{
    match rows.checked_mul(cols) {
        Some(size) if size <= isize::MAX as usize => Ok(size),
        _ => Err(Error::Overflow { rows, cols }),
    }
}

#[inline]
pub(crate) fn length_mismatch(expected: usize, actual: usize) -> Error
{
    Error::LengthMismatch { expected, actual }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_classify_configuration_errors()
    {
        assert!(Error::InvalidWorkerCount(0).is_configuration());
        assert!(incompatible_shapes((2, 3), (2, 3)).is_configuration());
        assert!(!Error::Aborted("noise".into()).is_configuration());

        let failed = Error::WorkerFailed {
            dataset: "noise".into(),
            worker: 2,
            source: "sensor offline".into(),
        };
        assert_eq!(failed.kind(), ErrorKind::WorkerFailed);
        assert!(!failed.is_configuration());
    }

    #[test]
    fn display_names_the_dataset()
    {
        let err = Error::CollectFailed {
            dataset: "air_quality".into(),
            source: "closed".into(),
        };
        assert_eq!(err.to_string(), "collector failed for `air_quality`: closed");
        assert_eq!(length_mismatch(3, 4).to_string(), "length mismatch: expected 3, got 4");
    }

    #[test]
    fn shape_size_overflow()
    {
        assert_eq!(size_of_shape_checked(3, 4).unwrap(), 12);
        assert_eq!(size_of_shape_checked(0, usize::MAX).unwrap(), 0);
        let err = size_of_shape_checked(usize::MAX / 2, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert!(err.is_configuration());
        assert_eq!(size_of_shape_checked(isize::MAX as usize + 1, 1).unwrap_err().kind(), ErrorKind::Overflow);
    }
}
