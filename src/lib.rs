// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#![crate_name = "urbanpar"]
#![doc(html_root_url = "https://docs.rs/urbanpar/0.1/")]
#![warn(missing_debug_implementations)]

//! The `urbanpar` crate fills named datasets in parallel: it splits each
//! dataset into one contiguous partition per worker, lets every worker
//! compute its partition independently, and gathers the results back in
//! index order for a single collector.
//!
//! - [`partition()`] computes the `[start, end)` range of one worker.
//! - [`Pipeline`] runs partition / fill / gather cycles over [`Dataset`],
//!   [`RecordSet`] (fixed-width records) and [`PairedDataset`] (two sequences
//!   that are always filled together).
//! - [`Matrix`] and [`multiply`] provide a dense matrix product, which
//!   [`Pipeline::multiply`] parallelizes over rows of the result.
//!
//! ## Crate Feature Flags
//!
//! - `serde`
//!   - Enables serialization support for [`Partition`].
//!
//! ## Example
//!
//! ```
//! use urbanpar::prelude::*;
//!
//! let pipeline = Pipeline::new(3).unwrap();
//! let mut readings = Dataset::from_elem("noise", 10, 30);
//! let report = pipeline
//!     .run(&mut readings, |i| i as i32, |d| format!("{} {:?}", d.name(), d.as_slice()))
//!     .unwrap();
//! assert_eq!(report, "noise [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]");
//! ```

pub use crate::dataset::{Dataset, PairedDataset, RecordSet};
pub use crate::error::{BoxError, Error, ErrorKind, Result};
pub use crate::linalg::{multiply, Matrix};
pub use crate::linalg_traits::LinalgScalar;
pub use crate::partition::{partition, partitions, Partition, Partitions};
pub use crate::pipeline::{AbortHandle, Pipeline, PipelineBuilder};
pub use crate::split_at::{split_partitions_mut, split_records_mut};

mod dataset;
mod error;
mod gather;
pub mod linalg;
mod linalg_traits;
mod partition;
mod pipeline;
pub mod prelude;
mod split_at;
