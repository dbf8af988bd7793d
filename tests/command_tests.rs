use std::fs;
use tempfile::tempdir;
use trace_cost_studio::commands::{execute_analyze, validate_args, AnalyzeArgs};
use trace_cost_studio::output::read_report;

const FAUCET_TRACE: &str = r#"<root>
    <kernel_invoke ins="1000">
        <invoke kind="native" package="Faucet" function="free"/>
        <kernel_invoke ins="200">
            <invoke kind="native" package="Faucet" function="free"/>
        </kernel_invoke>
    </kernel_invoke>
    <kernel_drop_node ins="40"/>
    <kernel_invoke ins="900">
        <invoke kind="native" package="Package" function="publish_native"/>
        <before_invoke ins="100" size="200"/>
    </kernel_invoke>
</root>"#;

#[test]
fn test_validate_args_defaults_ok() {
    assert!(validate_args(&AnalyzeArgs::default()).is_ok());
}

#[test]
fn test_validate_args_rejects_zero_values() {
    let args = AnalyzeArgs {
        jobs: Some(0),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());

    let args = AnalyzeArgs {
        multiplier: Some(0),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());

    let args = AnalyzeArgs {
        input: "".into(),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_analyze_directory_end_to_end() {
    let traces = tempdir().unwrap();
    fs::write(traces.path().join("a.xml"), FAUCET_TRACE).unwrap();
    fs::write(traces.path().join("b.xml"), FAUCET_TRACE).unwrap();
    fs::write(traces.path().join("broken.xml"), "<root><unclosed>").unwrap();
    fs::write(traces.path().join("notes.txt"), "not a trace").unwrap();

    let out = tempdir().unwrap();
    let json = out.path().join("report.json");
    let args = AnalyzeArgs {
        input: traces.path().to_path_buf(),
        output_dir: Some(out.path().join("tables")),
        detailed: true,
        json: Some(json.clone()),
        jobs: Some(2),
        ..Default::default()
    };

    let report = execute_analyze(args).unwrap();

    assert_eq!(report.counters.files_processed, 2);
    assert_eq!(report.skipped_files.len(), 1);
    assert!(report.skipped_files[0].path.ends_with("broken.xml"));
    assert_eq!(report.baseline, Some(40));

    let faucet = report
        .summary
        .iter()
        .find(|r| r.signature == "kernel_invoke::native::Faucet::free")
        .unwrap();
    // two samples of 800 and two of 200
    assert_eq!(faucet.representative_cost, 500);

    let native: Vec<_> = report
        .native_costs
        .iter()
        .map(|c| (c.package.as_str(), c.function.as_str(), c.cost))
        .collect();
    assert_eq!(native, vec![("Faucet", "free", 500)]);
    assert!(report
        .summary
        .iter()
        .any(|r| r.signature == "kernel_invoke::native::Package::publish_native::200"));

    for name in [
        "detailed_costs.txt",
        "cost_summary.txt",
        "cost_summary.csv",
        "native_function_base_costs.csv",
        "size_cost_models.txt",
    ] {
        assert!(out.path().join("tables").join(name).exists(), "{}", name);
    }

    let loaded = read_report(&json).unwrap();
    assert_eq!(loaded.summary.len(), report.summary.len());
}

#[test]
fn test_analyze_config_file_multiplier() {
    let traces = tempdir().unwrap();
    fs::write(traces.path().join("run.xml"), FAUCET_TRACE).unwrap();
    let config = traces.path().join("analysis.toml");
    fs::write(&config, "multiplier = 4\n").unwrap();

    let args = AnalyzeArgs {
        input: traces.path().to_path_buf(),
        config: Some(config),
        output_dir: Some(traces.path().join("out")),
        ..Default::default()
    };

    let report = execute_analyze(args).unwrap();
    assert_eq!(report.multiplier, 4);
    let drop = report
        .summary
        .iter()
        .find(|r| r.signature == "kernel_drop_node")
        .unwrap();
    assert_eq!(drop.coefficient, Some(4));
}

#[test]
fn test_analyze_missing_input() {
    let dir = tempdir().unwrap();
    let args = AnalyzeArgs {
        input: dir.path().join("does-not-exist"),
        ..Default::default()
    };
    assert!(execute_analyze(args).is_err());
}

#[test]
fn test_analyze_only_broken_traces() {
    let traces = tempdir().unwrap();
    fs::write(traces.path().join("broken.xml"), "<root").unwrap();

    let args = AnalyzeArgs {
        input: traces.path().to_path_buf(),
        ..Default::default()
    };
    assert!(execute_analyze(args).is_err());
}
