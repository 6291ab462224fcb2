// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use fseq_cli::{DirectoryDataset, Settings};
use fseq_core::Dataset;
use fseq_events::{EventDetector, TargetLabel};
use fseq_health::{HealthCheckEngine, remove_problematic_records};
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_record(dir: &Path, name: &str, phases: Vec<i64>, altitude: Vec<f64>) {
    let index: Vec<i64> = (0..phases.len() as i64).collect();
    write_indexed(dir, name, index, phases, altitude);
}

fn write_indexed(dir: &Path, name: &str, index: Vec<i64>, phases: Vec<i64>, altitude: Vec<f64>) {
    let body = json!({
        "index": index,
        "columns": {
            "CL": phases,
            "ALT [ft]": altitude,
        }
    });
    fs::write(dir.join(format!("{name}.json")), body.to_string()).expect("write record");
}

fn blocks(parts: &[(i64, usize)]) -> Vec<i64> {
    parts
        .iter()
        .flat_map(|&(label, width)| std::iter::repeat_n(label, width))
        .collect()
}

#[test]
fn health_check_over_directory_drops_corrupt_and_failing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let climb = vec![0.0, 2500.0, 0.0];
    write_record(root, "flight_01", vec![0, 1, 0], climb.clone());
    fs::write(root.join("flight_02.json"), "truncated{").expect("write corrupt");
    write_indexed(root, "flight_03", vec![0, 2, 3], vec![0, 1, 0], climb);
    write_record(root, "flight_04", vec![0, 1, 0], vec![0.0, 300.0, 0.0]);

    let mut dataset = DirectoryDataset::open(dir.path()).expect("open dataset");
    let engine = HealthCheckEngine::new(Settings::default().health).expect("default config");
    let report = remove_problematic_records(&mut dataset, &engine).expect("health check");

    assert_eq!(report.corrupted().len(), 1);
    assert_eq!(report.corrupted()[0].name, "flight_02");
    assert_eq!(report.failing("continuity"), &["flight_03"]);
    assert_eq!(
        report.failing("sufficiency(ALT [ft] >= 2000 || index >= 2000)"),
        &["flight_04"]
    );
    assert_eq!(dataset.record_names(), vec!["flight_01"]);
    assert!(dir.path().join("flight_02.json").exists());
}

#[test]
fn event_scan_over_directory_reports_repeated_attempts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repeated = blocks(&[(0, 30), (4, 25), (0, 30), (4, 25), (0, 30)]);
    let single = blocks(&[(0, 30), (4, 25), (0, 85)]);
    for (name, phases) in [("flight_a", repeated), ("flight_b", single)] {
        let n = phases.len();
        write_record(dir.path(), name, phases, vec![1000.0; n]);
    }

    let mut config = Settings::default().events;
    config.target = TargetLabel::Fixed(4);
    let mut dataset = DirectoryDataset::open(dir.path()).expect("open dataset");
    let found = EventDetector::new(config)
        .expect("config should be valid")
        .detect_dataset(&mut dataset)
        .expect("scan should succeed");

    assert_eq!(found.len(), 1);
    assert_eq!(found["flight_a"], vec![30, 85]);
    assert_eq!(dataset.position(), 0);
}
