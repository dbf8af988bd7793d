//! Report building and output writers.
//!
//! This module turns a cost model into returnable report data and writes
//! it to disk in various formats:
//! - plain-text detailed and summary tables
//! - CSV summary and native base-cost triples
//! - size model coefficients
//! - JSON report

pub mod delimited;
pub mod json;
pub mod report;
pub mod table;
pub mod text;

// Re-export main functions
pub use delimited::{native_costs_to_csv, summary_to_csv};
pub use json::{read_report, write_report};
pub use report::{
    build_report, detailed_rows, native_costs, summary_rows, CostReport, DetailedRow, NativeCost,
    SkippedFile, SummaryRow,
};
pub use table::{render_detailed_table, render_size_models, render_summary_table};
pub use text::write_text;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate an output path and create its parent directories
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
