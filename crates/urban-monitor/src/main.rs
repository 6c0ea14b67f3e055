// Copyright 2024 urbanpar developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use urban_monitor::{write_outcomes, ConfigOverrides, MonitorConfig, MonitorSuite, TaskKind};
use urbanpar::Pipeline;

/// Fill synthetic urban sensor datasets in parallel and print their reports.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML file with dataset sizes, worker count and seed
    #[arg(short, long, env = "URBAN_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Run only these tasks (may be repeated)
    #[arg(long, value_enum)]
    only: Vec<TaskKind>,

    /// Print one summary line per task instead of every row
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn init_tracing(verbose: u8)
{
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<MonitorConfig>
{
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_file(path)?,
        None => MonitorConfig::default(),
    };
    cli.overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<ExitCode>
{
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli).context("loading configuration")?;
    debug!(?config, "configuration");
    let pipeline = Pipeline::builder()
        .workers(config.worker_count())
        .build()
        .context("starting worker pool")?;
    info!(workers = pipeline.workers(), seed = config.seed, "pipeline ready");

    let kinds = if cli.only.is_empty() { TaskKind::ALL.to_vec() } else { cli.only.clone() };
    let start = Instant::now();
    let outcomes = MonitorSuite::new(&pipeline, &config).run_all(&kinds);
    let elapsed = start.elapsed();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let failed = write_outcomes(&mut out, &outcomes, cli.quiet)?;
    writeln!(out, "Execution Time: {:.6} seconds", elapsed.as_secs_f64())?;

    if failed > 0 {
        info!(failed, "some tasks failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
