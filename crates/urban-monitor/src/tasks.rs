// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The urban monitoring tasks.
//!
//! Every task is one or two pipeline runs over its own dataset with its own
//! random stream; reports are produced by the collectors after the workers
//! are done. Tasks share no state, so one failing task does not affect the
//! others.

use std::convert::Infallible;
use std::fmt;

use clap::ValueEnum;
use tracing::{info, info_span, warn};

use urbanpar::{Dataset, Matrix, PairedDataset, Pipeline, RecordSet};
use urbanpar_rand::rand_distr::{Distribution, Uniform};
use urbanpar_rand::{RandomExt, SeedStream};

use crate::config::MonitorConfig;
use crate::report::Report;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Pipeline(#[from] urbanpar::Error),

    #[error("invalid value range {low}..{high}")]
    Range { low: i64, high: i64 },

    #[error("{0}")]
    Precondition(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum TaskKind {
    TrafficFlow,
    Incidents,
    Congestion,
    VehicleCount,
    SignalControl,
    Forecast,
    AirQuality,
    Noise,
    GreenWave,
    EvCharging,
    Transit,
    Simulation,
    Matrix,
}

impl TaskKind {
    pub const ALL: [TaskKind; 13] = [
        TaskKind::TrafficFlow,
        TaskKind::Incidents,
        TaskKind::Congestion,
        TaskKind::VehicleCount,
        TaskKind::SignalControl,
        TaskKind::Forecast,
        TaskKind::AirQuality,
        TaskKind::Noise,
        TaskKind::GreenWave,
        TaskKind::EvCharging,
        TaskKind::Transit,
        TaskKind::Simulation,
        TaskKind::Matrix,
    ];

    /// Name of the task's dataset, also used to fork its random stream.
    pub fn dataset(self) -> &'static str
    {
        match self {
            TaskKind::TrafficFlow => "traffic_flow",
            TaskKind::Incidents => "incidents",
            TaskKind::Congestion => "traffic_density",
            TaskKind::VehicleCount => "vehicle_count",
            TaskKind::SignalControl => "traffic_lights",
            TaskKind::Forecast => "historical_traffic",
            TaskKind::AirQuality => "air_quality",
            TaskKind::Noise => "noise",
            TaskKind::GreenWave => "green_wave",
            TaskKind::EvCharging => "charging_stations",
            TaskKind::Transit => "public_transport",
            TaskKind::Simulation => "traffic_simulation",
            TaskKind::Matrix => "matrix_product",
        }
    }

    pub fn title(self) -> &'static str
    {
        match self {
            TaskKind::TrafficFlow => "Traffic Flow Monitoring",
            TaskKind::Incidents => "Incident Detection",
            TaskKind::Congestion => "Traffic Congestion",
            TaskKind::VehicleCount => "Vehicle Counting",
            TaskKind::SignalControl => "Adaptive Signal Control",
            TaskKind::Forecast => "Predictive Analytics",
            TaskKind::AirQuality => "Air Quality Monitoring",
            TaskKind::Noise => "Noise Pollution Monitoring",
            TaskKind::GreenWave => "Green Wave System",
            TaskKind::EvCharging => "EV Charging Integration",
            TaskKind::Transit => "Public Transport Integration",
            TaskKind::Simulation => "Traffic Simulation",
            TaskKind::Matrix => "Matrix Multiplication",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.title())
    }
}

/// The result of running one task.
#[derive(Debug)]
pub struct TaskOutcome {
    pub kind: TaskKind,
    pub result: Result<Report, TaskError>,
}

impl TaskOutcome {
    pub fn is_ok(&self) -> bool
    {
        self.result.is_ok()
    }
}

/// Runs monitoring tasks on a shared pipeline.
#[derive(Debug)]
pub struct MonitorSuite<'a> {
    pipeline: &'a Pipeline,
    config: &'a MonitorConfig,
    root: SeedStream,
}

impl<'a> MonitorSuite<'a> {
    pub fn new(pipeline: &'a Pipeline, config: &'a MonitorConfig) -> Self
    {
        MonitorSuite {
            pipeline,
            config,
            root: SeedStream::new(config.seed),
        }
    }

    /// Run `kinds` one after another, collecting every outcome.
    pub fn run_all(&self, kinds: &[TaskKind]) -> Vec<TaskOutcome>
    {
        kinds
            .iter()
            .map(|&kind| TaskOutcome { kind, result: self.run(kind) })
            .collect()
    }

    pub fn run(&self, kind: TaskKind) -> Result<Report, TaskError>
    {
        let span = info_span!("task", name = kind.dataset());
        let _enter = span.enter();
        let c = self.config;
        let result = match kind {
            TaskKind::TrafficFlow => self.scalar(kind, c.vehicles, 0, (0, 100), |r, i, v| {
                r.row("Vehicle", i, format_args!("{} vehicles detected", v))
            }),
            TaskKind::Incidents => self.incidents(),
            TaskKind::Congestion => self.scalar(kind, c.cameras, 0, (0, 100), |r, i, v| {
                r.row("Camera", i, format_args!("{} traffic density", v))
            }),
            TaskKind::VehicleCount => self.scalar(kind, c.sensors, 0, (0, 500), |r, i, v| {
                r.row("Section", i, format_args!("{} vehicles", v))
            }),
            TaskKind::SignalControl => self.signal_control(),
            TaskKind::Forecast => self.forecast(),
            TaskKind::AirQuality => self.scalar(kind, c.sensors, 50, (0, 200), |r, i, v| {
                r.row("Sensor", i, format_args!("{} AQI", v))
            }),
            TaskKind::Noise => self.scalar(kind, c.sensors, 30, (0, 100), |r, i, v| {
                r.row("Sensor", i, format_args!("{} dB", v))
            }),
            TaskKind::GreenWave => self.green_wave(),
            TaskKind::EvCharging => self.ev_charging(),
            TaskKind::Transit => self.scalar(kind, c.transit_stops, 0, (0, 100), |r, i, v| {
                r.row("Stop", i, format_args!("{} passengers", v))
            }),
            TaskKind::Simulation => self.simulation(),
            TaskKind::Matrix => self.matrix(),
        };
        match &result {
            Ok(report) => info!(rows = report.rows.len(), "task finished"),
            Err(err) => warn!(error = %err, "task failed"),
        }
        result
    }

    fn stream(&self, kind: TaskKind) -> SeedStream
    {
        self.root.fork(kind.dataset())
    }

    /// One scalar dataset drawn uniformly from `low..high`, one row per element.
    fn scalar<F>(&self, kind: TaskKind, len: usize, default: i32, (low, high): (i32, i32), row: F)
        -> Result<Report, TaskError>
    where F: Fn(&mut Report, usize, i32)
    {
        let dist = uniform(low, high)?;
        let mut data = Dataset::from_elem(kind.dataset(), len, default);
        let report = self.pipeline.run(&mut data, self.stream(kind).sampler(dist), |d| {
            let mut report = Report::new(kind.title());
            for (i, &v) in d.iter().enumerate() {
                row(&mut report, i, v);
            }
            report
        })?;
        Ok(report)
    }

    fn incidents(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::Incidents;
        let dist = uniform(0, 2)?;
        let mut data = Dataset::from_elem(kind.dataset(), self.config.sensors, 0);
        let report = self.pipeline.run(&mut data, self.stream(kind).sampler(dist), |d| {
            let mut report = Report::new(kind.title());
            for (i, &v) in d.iter().enumerate() {
                report.row("Sensor", i, v);
            }
            let total: i32 = d.iter().sum();
            report.summarize(format!("Total incidents detected: {}", total));
            report
        })?;
        Ok(report)
    }

    /// Traffic density as measured by the congestion cameras.
    fn traffic_density(&self) -> Result<Dataset<i32>, TaskError>
    {
        let kind = TaskKind::Congestion;
        let mut density = Dataset::from_elem(kind.dataset(), self.config.cameras, 0);
        density.fill_random(self.pipeline, uniform(0, 100)?, self.stream(kind))?;
        Ok(density)
    }

    fn signal_control(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::SignalControl;
        let density = self.traffic_density()?;
        if density.is_empty() && self.config.intersections > 0 {
            return Err(TaskError::Precondition("no traffic density to control signals with".into()));
        }
        let phases = self.config.signal_phases;
        let mut lights = RecordSet::from_elem(kind.dataset(), self.config.intersections, phases, 0)?;
        let report = self.pipeline.run_records(
            &mut lights,
            |i, record: &mut [i32]| {
                for (j, phase) in record.iter_mut().enumerate() {
                    *phase = density[(i * phases + j) % density.len()] % 3;
                }
                Ok::<_, Infallible>(())
            },
            |r| Ok::<_, Infallible>(record_report(kind, r)),
        )?;
        Ok(report)
    }

    fn forecast(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::Forecast;
        let stream = self.stream(kind);
        let mut history = Dataset::from_elem(kind.dataset(), self.config.history_days, 0);
        let mut report = self.pipeline.run(&mut history, stream.sampler(uniform(0, 100)?), |d| {
            let mut report = Report::new(kind.title());
            for (i, &v) in d.iter().enumerate() {
                report.row("Day", i, format_args!("{} vehicles", v));
            }
            report
        })?;

        if self.config.forecast_days > 0 && history.is_empty() {
            return Err(TaskError::Precondition("no history to forecast from".into()));
        }
        let noise = uniform(0, 10)?;
        let future_stream = stream.fork("future");
        let mut future = Dataset::from_elem("future_traffic", self.config.forecast_days, 0);
        let predicted = self.pipeline.run(
            &mut future,
            |i| history[i % history.len()] + future_stream.sample_at(i, &noise),
            |d| {
                d.iter()
                    .enumerate()
                    .map(|(i, v)| format!("Forecast day {}: {} vehicles", i, v))
                    .collect::<Vec<_>>()
            },
        )?;
        report.summary.extend(predicted);
        Ok(report)
    }

    fn green_wave(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::GreenWave;
        let mut lights =
            RecordSet::from_elem(kind.dataset(), self.config.intersections, self.config.signal_phases, 0)?;
        lights.fill_random(self.pipeline, uniform(0, 2)?, self.stream(kind))?;
        Ok(record_report(kind, &lights))
    }

    fn ev_charging(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::EvCharging;
        let dist = uniform(0, 2)?;
        let mut stations = Dataset::from_elem(kind.dataset(), self.config.ev_stations, 1);
        let report = self.pipeline.run(&mut stations, self.stream(kind).sampler(dist), |d| {
            let mut report = Report::new(kind.title());
            for (i, &v) in d.iter().enumerate() {
                report.row("Charging Station", i, if v == 0 { "Available" } else { "Occupied" });
            }
            let available = d.iter().filter(|&&v| v == 0).count();
            report.summarize(format!("Available stations: {} of {}", available, d.len()));
            report
        })?;
        Ok(report)
    }

    fn simulation(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::Simulation;
        let len = self.config.sensors;
        let (flow_dist, incident_dist) = (uniform(0, 100)?, uniform(0, 2)?);
        let stream = self.stream(kind);
        let mut sim = PairedDataset::new(
            kind.dataset(),
            Dataset::from_elem("traffic_flow", len, 0),
            Dataset::from_elem("incidents", len, 0),
        )?;
        let report = self.pipeline.run_paired(
            &mut sim,
            |i| {
                let mut rng = stream.rng_at(i);
                let flow: i32 = flow_dist.sample(&mut rng);
                let incident: i32 = incident_dist.sample(&mut rng);
                Ok::<_, Infallible>((flow, incident))
            },
            |s| {
                let mut report = Report::new(kind.title());
                for (i, (flow, incident)) in s.iter().enumerate() {
                    report.row("Location", i, format_args!("Traffic Flow = {}, Incidents = {}", flow, incident));
                }
                Ok::<_, Infallible>(report)
            },
        )?;
        Ok(report)
    }

    fn matrix(&self) -> Result<Report, TaskError>
    {
        let kind = TaskKind::Matrix;
        let n = self.config.matrix_size;
        let cells = n
            .checked_mul(n)
            .ok_or_else(|| TaskError::Precondition(format!("matrix size {} is too large", n)))?;
        let a = Matrix::from_shape_vec((n, n), vec![1_i64; cells])?;
        let b = a.clone();
        let c = self.pipeline.multiply(&a, &b)?;
        let mut report = Report::new(kind.title());
        for i in 0..c.nrows() {
            report.row("Row", i, c.row(i).iter().sum::<i64>());
        }
        report.summarize(format!("Result: {}x{} matrix", c.nrows(), c.ncols()));
        Ok(report)
    }
}

fn record_report(kind: TaskKind, records: &RecordSet<i32>) -> Report
{
    let mut report = Report::new(kind.title());
    for (i, record) in records.records().enumerate() {
        let fields = record.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        report.row("Intersection", i, fields.join(" "));
    }
    report
}

fn uniform(low: i32, high: i32) -> Result<Uniform<i32>, TaskError>
{
    Uniform::new(low, high).map_err(|_| TaskError::Range {
        low: low.into(),
        high: high.into(),
    })
}
