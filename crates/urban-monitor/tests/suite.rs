use std::io::Write;

use urban_monitor::{write_outcomes, ConfigError, MonitorConfig, MonitorSuite, TaskError, TaskKind};
use urbanpar::Pipeline;

fn small() -> MonitorConfig
{
    MonitorConfig::default().uniform_size(12).seed(7)
}

fn reports(workers: usize, config: &MonitorConfig) -> Vec<String>
{
    let pipeline = Pipeline::new(workers).unwrap();
    MonitorSuite::new(&pipeline, config)
        .run_all(&TaskKind::ALL)
        .into_iter()
        .map(|o| o.result.unwrap().to_string())
        .collect()
}

#[test]
fn every_task_reports_every_row()
{
    let config = small();
    let pipeline = Pipeline::new(3).unwrap();
    let suite = MonitorSuite::new(&pipeline, &config);
    for kind in TaskKind::ALL {
        let report = suite.run(kind).unwrap();
        assert_eq!(report.title, kind.title());
        assert_eq!(report.rows.len(), 12, "{:?}", kind);
    }
}

#[test]
fn reports_do_not_depend_on_worker_count()
{
    let config = small();
    let one = reports(1, &config);
    for workers in [2, 5, 16] {
        assert_eq!(reports(workers, &config), one);
    }
}

#[test]
fn seed_changes_the_data()
{
    let pipeline = Pipeline::new(2).unwrap();
    let a = small();
    let b = small().seed(8);
    let ra = MonitorSuite::new(&pipeline, &a).run(TaskKind::TrafficFlow).unwrap();
    let rb = MonitorSuite::new(&pipeline, &b).run(TaskKind::TrafficFlow).unwrap();
    assert_ne!(ra.rows, rb.rows);
}

#[test]
fn row_formats()
{
    let config = small();
    let pipeline = Pipeline::new(4).unwrap();
    let suite = MonitorSuite::new(&pipeline, &config);

    let flow = suite.run(TaskKind::TrafficFlow).unwrap();
    assert!(flow.rows[0].starts_with("Vehicle 0: "));
    assert!(flow.rows[0].ends_with(" vehicles detected"));

    let ev = suite.run(TaskKind::EvCharging).unwrap();
    for row in &ev.rows {
        assert!(row.ends_with("Available") || row.ends_with("Occupied"), "{}", row);
    }

    let sim = suite.run(TaskKind::Simulation).unwrap();
    assert!(sim.rows[11].starts_with("Location 11: Traffic Flow = "));
    assert!(sim.rows[11].contains(", Incidents = "));

    let lights = suite.run(TaskKind::SignalControl).unwrap();
    for row in &lights.rows {
        let (_, fields) = row.split_once(": ").unwrap();
        let fields: Vec<i32> = fields.split(' ').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 4);
        assert!(fields.iter().all(|&f| (0..3).contains(&f)));
    }
}

#[test]
fn incident_total_matches_rows()
{
    let config = small();
    let pipeline = Pipeline::new(3).unwrap();
    let report = MonitorSuite::new(&pipeline, &config).run(TaskKind::Incidents).unwrap();
    let total: i32 = report
        .rows
        .iter()
        .map(|r| r.rsplit(' ').next().unwrap().parse::<i32>().unwrap())
        .sum();
    assert_eq!(report.summary, vec![format!("Total incidents detected: {}", total)]);
}

#[test]
fn forecast_follows_history()
{
    let config = small();
    let pipeline = Pipeline::new(3).unwrap();
    let report = MonitorSuite::new(&pipeline, &config).run(TaskKind::Forecast).unwrap();
    let value = |line: &str| -> i32 {
        line.split(": ").nth(1).unwrap().split(' ').next().unwrap().parse().unwrap()
    };
    assert_eq!(report.summary.len(), 12);
    for (day, predicted) in report.rows.iter().zip(&report.summary) {
        let delta = value(predicted) - value(day);
        assert!((0..10).contains(&delta), "{} vs {}", day, predicted);
    }
}

#[test]
fn matrix_rows_sum_to_size()
{
    let config = small();
    let pipeline = Pipeline::new(5).unwrap();
    let report = MonitorSuite::new(&pipeline, &config).run(TaskKind::Matrix).unwrap();
    assert!(report.rows.iter().all(|r| r.ends_with(": 12")));
}

#[test]
fn empty_datasets_report_nothing()
{
    let config = MonitorConfig::default().uniform_size(0);
    assert!(config.validate().is_ok());
    let pipeline = Pipeline::new(4).unwrap();
    for outcome in MonitorSuite::new(&pipeline, &config).run_all(&TaskKind::ALL) {
        assert!(outcome.result.unwrap().rows.is_empty());
    }
}

#[test]
fn aborted_pipeline_fails_every_task()
{
    let config = small();
    let pipeline = Pipeline::new(2).unwrap();
    pipeline.abort_handle().abort();
    let outcomes = MonitorSuite::new(&pipeline, &config).run_all(&[TaskKind::Noise, TaskKind::Matrix]);
    assert!(outcomes.iter().all(|o| !o.is_ok()));
}

#[test]
fn failed_tasks_print_one_line_without_rows()
{
    let config = small();
    let pipeline = Pipeline::new(2).unwrap();
    let suite = MonitorSuite::new(&pipeline, &config);
    let mut outcomes = suite.run_all(&[TaskKind::Transit]);
    pipeline.abort_handle().abort();
    outcomes.extend(suite.run_all(&[TaskKind::Noise]));

    let mut out = Vec::new();
    let failed = write_outcomes(&mut out, &outcomes, false).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(failed, 1);
    assert!(out.starts_with("Public Transport Integration Data:\nStop 0: "));
    assert!(out.ends_with("Noise Pollution Monitoring: unavailable (run of `noise` was aborted)\n"));
    assert!(!out.contains("dB"));

    let mut brief = Vec::new();
    write_outcomes(&mut brief, &outcomes, true).unwrap();
    assert!(String::from_utf8(brief).unwrap().starts_with("Public Transport Integration: 12 rows\n"));
}

#[test]
fn oversized_matrix_fails_the_task()
{
    let mut config = small();
    config.matrix_size = usize::MAX / 2;
    assert!(config.validate().is_err());
    let pipeline = Pipeline::new(2).unwrap();
    let err = MonitorSuite::new(&pipeline, &config).run(TaskKind::Matrix).unwrap_err();
    assert!(matches!(err, TaskError::Precondition(_)));
}

#[test]
fn config_file()
{
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "workers = 2\nseed = 11\nsensors = 9").unwrap();
    let config = MonitorConfig::from_file(file.path()).unwrap();
    assert_eq!((config.worker_count(), config.seed, config.sensors), (2, 11, 9));

    let missing = file.path().with_extension("missing");
    assert!(matches!(MonitorConfig::from_file(&missing), Err(ConfigError::Io { .. })));
}
