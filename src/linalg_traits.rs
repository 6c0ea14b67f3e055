// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use num_traits::{One, Zero};

use std::ops::{Add, Mul};

/// Elements that support the matrix product.
///
/// `'static + Copy` so that cells need no destructors, `Send + Sync` so
/// that operands can be shared with workers, and the rest are numerical
/// traits.
pub trait LinalgScalar:
    'static
    + Copy
    + Send
    + Sync
    + Zero
    + One
    + Add<Output = Self>
    + Mul<Output = Self>
{
}

impl<T> LinalgScalar for T where
    T: 'static
        + Copy
        + Send
        + Sync
        + Zero
        + One
        + Add<Output = T>
        + Mul<Output = T>
{
}
