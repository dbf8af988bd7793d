//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Discovers trace files in the input directory
//! 2. Parses and aggregates them in parallel
//! 3. Builds the cost model (statistics, size models, coefficients)
//! 4. Writes or prints the report tables

use crate::aggregator::{
    aggregate_files, aggregate_files_with_jobs, discover_trace_files, BatchResult,
};
use crate::commands::models::AnalyzeArgs;
use crate::output::{
    build_report, native_costs_to_csv, render_detailed_table, render_size_models,
    render_summary_table, summary_to_csv, write_report, write_text, CostReport,
};
use crate::stats::build_cost_model;
use crate::utils::config::{
    load_config, AnalysisConfig, DETAILED_TABLE_FILE, MODELS_FILE, NATIVE_COSTS_FILE,
    SUMMARY_CSV_FILE, SUMMARY_TABLE_FILE,
};
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was rendered, for callers that want the data
///
/// # Errors
/// * Missing input path or no trace files
/// * Invalid config file
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<CostReport> {
    let start_time = Instant::now();

    validate_args(&args)?;
    let config = resolve_config(&args)?;
    debug!("Analysis config: {:?}", config);

    info!("Discovering trace files in {}...", args.input.display());
    let files = discover_trace_files(&args.input).context("Failed to collect trace files")?;

    info!("Aggregating {} trace files...", files.len());
    let BatchResult { table, skipped } = match args.jobs {
        Some(jobs) => aggregate_files_with_jobs(&files, jobs),
        None => aggregate_files(&files),
    }
    .context("Failed to aggregate traces")?;

    info!("Building cost model...");
    let model = build_cost_model(&table, &config);
    let report = build_report(&model, table.counters, &skipped, config.multiplier);

    write_outputs(&args, &report)?;

    print_run_summary(&report);
    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.jobs == Some(0) {
        anyhow::bail!("jobs must be greater than 0");
    }

    if args.multiplier == Some(0) {
        anyhow::bail!("multiplier must be greater than 0");
    }

    Ok(())
}

/// Load the config file, then apply command-line overrides
///
/// **Private** - internal helper for execute_analyze
fn resolve_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path).context("Failed to load analysis config")?,
        None => AnalysisConfig::default(),
    };

    if let Some(multiplier) = args.multiplier {
        config.multiplier = multiplier;
    }

    Ok(config)
}

/// Write tables to the output directory, or print them
///
/// **Private** - internal helper for execute_analyze
fn write_outputs(args: &AnalyzeArgs, report: &CostReport) -> Result<()> {
    let summary_table = render_summary_table(&report.summary);
    let summary_csv = summary_to_csv(&report.summary).context("Failed to render summary CSV")?;

    match &args.output_dir {
        Some(dir) => write_to_directory(dir, args, report, &summary_table, &summary_csv)?,
        None => {
            if args.detailed {
                println!("{}", render_detailed_table(&report.detailed));
            }
            if args.csv {
                print!("{}", summary_csv);
            } else {
                println!("{}", summary_table);
            }
            if !report.size_models.is_empty() {
                println!("{}", render_size_models(&report.size_models));
            }
        }
    }

    if let Some(path) = &args.json {
        write_report(report, path).context("Failed to write JSON report")?;
    }

    Ok(())
}

/// **Private** - internal helper for write_outputs
fn write_to_directory(
    dir: &Path,
    args: &AnalyzeArgs,
    report: &CostReport,
    summary_table: &str,
    summary_csv: &str,
) -> Result<()> {
    info!("Writing output files to {}...", dir.display());

    if args.detailed {
        write_text(&render_detailed_table(&report.detailed), dir.join(DETAILED_TABLE_FILE))
            .context("Failed to write detailed table")?;
    }

    write_text(summary_table, dir.join(SUMMARY_TABLE_FILE))
        .context("Failed to write summary table")?;
    write_text(summary_csv, dir.join(SUMMARY_CSV_FILE)).context("Failed to write summary CSV")?;

    let native = native_costs_to_csv(&report.native_costs)
        .context("Failed to render native function costs")?;
    write_text(&native, dir.join(NATIVE_COSTS_FILE))
        .context("Failed to write native function costs")?;

    if !report.size_models.is_empty() {
        write_text(
            &render_size_models(&report.size_models),
            dir.join(MODELS_FILE),
        )
        .context("Failed to write size models")?;
    }

    Ok(())
}

/// Print a short colored run summary to stdout
///
/// **Private** - internal helper for execute_analyze
fn print_run_summary(report: &CostReport) {
    let counters = &report.counters;

    println!("{}", "Trace cost analysis".bold());
    println!(
        "  Files:       {} processed, {} skipped",
        counters.files_processed.to_string().green(),
        if report.skipped_files.is_empty() {
            "0".normal()
        } else {
            report.skipped_files.len().to_string().yellow()
        }
    );
    println!("  Signatures:  {}", report.summary.len());
    match report.baseline {
        Some(baseline) => println!(
            "  Baseline:    {} instructions (multiplier {})",
            baseline, report.multiplier
        ),
        None => println!("  Baseline:    {}", "unavailable".yellow()),
    }

    if counters.overflow_samples > 0 {
        println!(
            "  {} {} overflow samples dropped",
            "!".yellow(),
            counters.overflow_samples
        );
    }
    if counters.unrepresentable_samples > 0 {
        println!(
            "  {} {} out-of-range samples dropped",
            "!".yellow(),
            counters.unrepresentable_samples
        );
    }
    if counters.conflicting_samples > 0 {
        println!(
            "  {} {} samples dropped on conflicting signature keys",
            "!".yellow(),
            counters.conflicting_samples
        );
    }
    if counters.negative_samples > 0 {
        println!(
            "  {} {} samples with negative exclusive cost",
            "!".yellow(),
            counters.negative_samples
        );
    }
    for skipped in &report.skipped_files {
        println!(
            "  {} skipped {}: {}",
            "✗".red(),
            skipped.path.display(),
            skipped.reason
        );
    }
}
