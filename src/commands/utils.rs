use crate::aggregator::CostAggregator;
use crate::parser::parse_trace_file;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

/// Validate a single trace file and show what it would contribute
pub fn validate_trace_file(file_path: PathBuf) -> Result<()> {
    println!("Validating trace: {}", file_path.display());

    let root = parse_trace_file(&file_path)
        .with_context(|| format!("Invalid trace file {}", file_path.display()))?;

    let mut aggregator = CostAggregator::new();
    aggregator.ingest(&root);
    let table = aggregator.finalize();

    println!("{}", "✓ Valid trace file".green());
    println!("  Nodes: {}", root.node_count());
    println!("  Samples: {}", table.total_samples());
    println!("  Signatures: {}", table.len());
    println!(
        "  Early returns excluded: {}",
        table.counters.excluded_early_returns
    );
    if table.counters.overflow_samples > 0 {
        println!(
            "  {} {}",
            "Overflow samples:".yellow(),
            table.counters.overflow_samples
        );
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Trace Cost Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Exclusive cost attribution and cost modeling for kernel execution traces.");
}
