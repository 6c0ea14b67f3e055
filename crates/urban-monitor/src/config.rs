// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Dataset sizes and run parameters.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Sizes of every dataset of the monitoring suite, plus worker count and seed.
///
/// Missing keys in a config file take their default value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Worker count; all available cores when unset.
    pub workers: Option<usize>,
    pub seed: u64,
    pub sensors: usize,
    pub cameras: usize,
    pub vehicles: usize,
    pub intersections: usize,
    /// Fields per traffic light record.
    pub signal_phases: usize,
    pub ev_stations: usize,
    pub history_days: usize,
    pub forecast_days: usize,
    pub transit_stops: usize,
    pub matrix_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self
    {
        MonitorConfig {
            workers: None,
            seed: 0,
            sensors: 100,
            cameras: 50,
            vehicles: 10_000,
            intersections: 50,
            signal_phases: 4,
            ev_stations: 50,
            history_days: 365,
            forecast_days: 7,
            transit_stops: 100,
            matrix_size: 200,
        }
    }
}

impl MonitorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError>
    {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError>
    {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn workers(mut self, workers: usize) -> Self
    {
        self.workers = Some(workers);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self
    {
        self.seed = seed;
        self
    }

    /// Scale every dataset down to `len` elements; handy for quick runs.
    pub fn uniform_size(mut self, len: usize) -> Self
    {
        self.sensors = len;
        self.cameras = len;
        self.vehicles = len;
        self.intersections = len;
        self.ev_stations = len;
        self.history_days = len;
        self.forecast_days = len;
        self.transit_stops = len;
        self.matrix_size = len;
        self
    }

    /// The worker count to build the pipeline with.
    pub fn worker_count(&self) -> usize
    {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Reject configurations that can not run.
    pub fn validate(&self) -> Result<(), ConfigError>
    {
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.signal_phases == 0 {
            return Err(ConfigError::Invalid("signal_phases must be at least 1".into()));
        }
        if self.intersections > 0 && self.cameras == 0 {
            return Err(ConfigError::Invalid(
                "signal control needs at least one camera for traffic density".into(),
            ));
        }
        if self.forecast_days > 0 && self.history_days == 0 {
            return Err(ConfigError::Invalid("forecasting needs at least one history day".into()));
        }
        if cells(self.matrix_size, self.matrix_size).is_none() {
            return Err(ConfigError::Invalid(format!("matrix_size {} is too large", self.matrix_size)));
        }
        if cells(self.intersections, self.signal_phases).is_none() {
            return Err(ConfigError::Invalid(format!(
                "{} intersections of {} signal phases is too large",
                self.intersections, self.signal_phases
            )));
        }
        Ok(())
    }
}

/// Command line overrides for [`MonitorConfig`].
#[derive(Clone, Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Number of parallel workers
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// Seed of every random stream
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of air quality, noise, incident and counting sensors
    #[arg(long)]
    pub sensors: Option<usize>,
    /// Number of congestion cameras
    #[arg(long)]
    pub cameras: Option<usize>,
    /// Number of tracked vehicles
    #[arg(long)]
    pub vehicles: Option<usize>,
    /// Number of signalized intersections
    #[arg(long)]
    pub intersections: Option<usize>,
    /// Number of EV charging stations
    #[arg(long)]
    pub ev_stations: Option<usize>,
    /// Days of traffic history
    #[arg(long)]
    pub history_days: Option<usize>,
    /// Days to forecast
    #[arg(long)]
    pub forecast_days: Option<usize>,
    /// Number of public transport stops
    #[arg(long)]
    pub transit_stops: Option<usize>,
    /// Side length of the square matrices multiplied
    #[arg(long)]
    pub matrix_size: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut MonitorConfig)
    {
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        set(&mut config.seed, self.seed);
        set(&mut config.sensors, self.sensors);
        set(&mut config.cameras, self.cameras);
        set(&mut config.vehicles, self.vehicles);
        set(&mut config.intersections, self.intersections);
        set(&mut config.ev_stations, self.ev_stations);
        set(&mut config.history_days, self.history_days);
        set(&mut config.forecast_days, self.forecast_days);
        set(&mut config.transit_stops, self.transit_stops);
        set(&mut config.matrix_size, self.matrix_size);
    }
}

/// Element count of a `rows × cols` buffer, if it can be allocated.
fn cells(rows: usize, cols: usize) -> Option<usize>
{
    rows.checked_mul(cols).filter(|&n| n <= isize::MAX as usize)
}

fn set<T>(field: &mut T, value: Option<T>)
{
    if let Some(v) = value {
        *field = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_city()
    {
        let c = MonitorConfig::default();
        assert_eq!((c.sensors, c.cameras, c.vehicles), (100, 50, 10_000));
        assert_eq!((c.history_days, c.forecast_days, c.matrix_size), (365, 7, 200));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml()
    {
        let c = MonitorConfig::from_toml_str("workers = 3\nsensors = 12\n").unwrap();
        assert_eq!(c.worker_count(), 3);
        assert_eq!(c.sensors, 12);
        assert_eq!(c.cameras, 50);
    }

    #[test]
    fn unknown_keys_are_rejected()
    {
        assert!(matches!(
            MonitorConfig::from_toml_str("drones = 10"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values()
    {
        assert!(MonitorConfig::default().workers(0).validate().is_err());
        let mut c = MonitorConfig::default();
        c.cameras = 0;
        assert!(c.validate().is_err());
        c.intersections = 0;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn oversized_datasets()
    {
        let mut c = MonitorConfig::default();
        c.matrix_size = usize::MAX / 2;
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

        let mut c = MonitorConfig::default();
        c.signal_phases = usize::MAX / 2;
        assert!(c.validate().is_err());
        c.intersections = 0;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn overrides_win()
    {
        let mut c = MonitorConfig::default().workers(2);
        let o = ConfigOverrides { sensors: Some(5), seed: Some(9), ..Default::default() };
        o.apply(&mut c);
        assert_eq!((c.workers, c.sensors, c.seed), (Some(2), 5, 9));
    }
}
