use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;
use trace_cost_studio::aggregator::{AggregateCounters, CostAggregator};
use trace_cost_studio::output::{
    build_report, read_report, validate_path, write_report, write_text, CostReport,
};
use trace_cost_studio::signature::Signature;
use trace_cost_studio::stats::build_cost_model;
use trace_cost_studio::utils::config::AnalysisConfig;
use trace_cost_studio::utils::error::OutputError;

fn sample_report() -> CostReport {
    let mut agg = CostAggregator::new();
    agg.record(Signature::bare("kernel_invoke::native::Faucet::free"), 800);
    agg.record(Signature::bare("kernel_drop_node"), 50);
    let table = agg.finalize();
    let model = build_cost_model(&table, &AnalysisConfig::default());
    build_report(&model, table.counters, &[], 16)
}

#[test]
fn test_write_and_read_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let report = sample_report();

    write_report(&report, &path).unwrap();
    let loaded = read_report(&path).unwrap();

    assert_eq!(loaded, report);
    assert_eq!(loaded.baseline, Some(50));
    assert_eq!(loaded.native_costs.len(), 1);
}

#[test]
fn test_report_without_baseline_omits_field() {
    let model = build_cost_model(
        &CostAggregator::new().finalize(),
        &AnalysisConfig::default(),
    );
    let report = build_report(&model, AggregateCounters::default(), &[], 16);

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("\"baseline\""));
    assert!(report.summary.is_empty());
}

#[test]
fn test_write_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("summary.txt");

    write_text("signature | cost\n", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "signature | cost\n");
}

#[test]
fn test_validate_path_rejects_empty_and_directories() {
    let dir = tempdir().unwrap();

    assert!(matches!(
        validate_path(std::path::Path::new("")),
        Err(OutputError::InvalidPath(_))
    ));
    assert!(matches!(
        validate_path(dir.path()),
        Err(OutputError::InvalidPath(_))
    ));
    assert!(validate_path(&dir.path().join("fresh.json")).is_ok());
}

#[test]
fn test_read_missing_report() {
    let dir = tempdir().unwrap();
    assert!(read_report(dir.path().join("absent.json")).is_err());
}
