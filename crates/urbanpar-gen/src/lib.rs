// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Build matrices and datasets with predictable contents for tests.

pub mod matrix_builder;

pub use crate::matrix_builder::{ElementGenerator, MatrixBuilder};

use urbanpar::Dataset;

/// A dataset whose element `i` is `i`.
pub fn sequential_dataset(name: &str, len: usize) -> Dataset<usize>
{
    Dataset::from_vec(name, (0..len).collect())
}
