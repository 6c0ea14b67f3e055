// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! urbanpar prelude.
//!
//! This module contains the most used types and functions that you can
//! import easily as a group.
//!
//! ```
//! use urbanpar::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::{Dataset, PairedDataset, RecordSet};

#[doc(no_inline)]
pub use crate::{AbortHandle, Pipeline};

#[doc(no_inline)]
pub use crate::{multiply, LinalgScalar, Matrix};

#[doc(no_inline)]
pub use crate::{partition, partitions, Partition};
