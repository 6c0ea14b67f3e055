// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::io;

use crate::tasks::TaskOutcome;

/// The human readable output of one task, built by its collector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    /// `"<Label> <index>: <value>"` rows, in index order.
    pub rows: Vec<String>,
    pub summary: Vec<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self
    {
        Report { title: title.into(), ..Default::default() }
    }

    pub fn row(&mut self, label: &str, index: usize, value: impl fmt::Display)
    {
        self.rows.push(format!("{} {}: {}", label, index, value));
    }

    pub fn summarize(&mut self, line: impl Into<String>)
    {
        self.summary.push(line.into());
    }

    /// Title and summary only.
    pub fn brief(&self) -> Brief<'_>
    {
        Brief(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        writeln!(f, "{} Data:", self.title)?;
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        for line in &self.summary {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Display adapter printing a report without its rows.
#[derive(Debug)]
pub struct Brief<'a>(&'a Report);

impl fmt::Display for Brief<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        writeln!(f, "{}: {} rows", self.0.title, self.0.rows.len())?;
        for line in &self.0.summary {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Print every outcome in order, a failed task as a single
/// `<title>: unavailable (<error>)` line. Returns the number of failed tasks.
pub fn write_outcomes<W>(out: &mut W, outcomes: &[TaskOutcome], quiet: bool) -> io::Result<usize>
where W: io::Write
{
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) if quiet => write!(out, "{}", report.brief())?,
            Ok(report) => write!(out, "{}", report)?,
            Err(err) => {
                failed += 1;
                writeln!(out, "{}: unavailable ({})", outcome.kind.title(), err)?;
            }
        }
    }
    Ok(failed)
}
