// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Synthetic urban sensor monitoring on top of `urbanpar` pipelines.
//!
//! [`MonitorSuite`] runs the monitoring tasks; each one fills its dataset in
//! parallel and renders a [`Report`] from the result.

pub mod config;
pub mod report;
pub mod tasks;

pub use crate::config::{ConfigError, ConfigOverrides, MonitorConfig};
pub use crate::report::{write_outcomes, Report};
pub use crate::tasks::{MonitorSuite, TaskError, TaskKind, TaskOutcome};
