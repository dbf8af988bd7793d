//! Report structures derived from the cost model.
//!
//! These are the engine's returnable outputs; how they are serialized
//! (plain tables, CSV, JSON) is left to the writers in this module.

use crate::aggregator::AggregateCounters;
use crate::stats::{CostMethod, CostModel, SizeModel};
use crate::utils::config::{NATIVE_INVOKE_PREFIX, SCHEMA_VERSION, SEGMENT_SEPARATOR};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Row of the detailed statistics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedRow {
    pub signature: String,
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: i64,
    pub median: i64,
}

/// Row of the summary cost table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// 1-based position after sorting by signature
    pub rank: usize,
    pub signature: String,
    pub representative_cost: i64,
    pub method: CostMethod,
    pub coefficient: Option<i64>,
    pub error: Option<f64>,
}

/// Base cost of one native function, for fee-schedule generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCost {
    pub package: String,
    pub function: String,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything one analysis run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    pub counters: AggregateCounters,
    pub skipped_files: Vec<SkippedFile>,

    /// Baseline cost the coefficients are relative to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<i64>,
    pub multiplier: u32,

    pub detailed: Vec<DetailedRow>,
    pub summary: Vec<SummaryRow>,
    pub native_costs: Vec<NativeCost>,
    pub size_models: Vec<SizeModel>,
}

/// Detailed statistics rows, sorted by signature
pub fn detailed_rows(model: &CostModel) -> Vec<DetailedRow> {
    let mut rows: Vec<DetailedRow> = model
        .rows
        .iter()
        .map(|r| DetailedRow {
            signature: r.signature.key.clone(),
            count: r.summary.count,
            min: r.summary.min,
            max: r.summary.max,
            mean: r.summary.mean,
            median: r.summary.median,
        })
        .collect();
    rows.sort_by(|a, b| a.signature.cmp(&b.signature));
    rows
}

/// Summary rows, sorted by signature and ranked from 1
pub fn summary_rows(model: &CostModel) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = model
        .rows
        .iter()
        .map(|r| {
            let coefficient = model
                .coefficients
                .as_ref()
                .and_then(|c| c.get(&r.signature.key));
            SummaryRow {
                rank: 0,
                signature: r.signature.key.clone(),
                representative_cost: r.representative_cost,
                method: r.method,
                coefficient: coefficient.map(|c| c.coefficient),
                error: coefficient.map(|c| c.error),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.signature.cmp(&b.signature));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

/// `(package, function, cost)` for native invocations without a size segment
pub fn native_costs(model: &CostModel) -> Vec<NativeCost> {
    let mut costs: Vec<NativeCost> = model
        .rows
        .iter()
        .filter(|r| !r.signature.is_size_dependent())
        .filter_map(|r| {
            let rest = r.signature.key.strip_prefix(NATIVE_INVOKE_PREFIX)?;
            let (package, function) = rest.split_once(SEGMENT_SEPARATOR)?;
            Some(NativeCost {
                package: package.to_string(),
                function: function.to_string(),
                cost: r.representative_cost,
            })
        })
        .collect();
    costs.sort_by(|a, b| (&a.package, &a.function).cmp(&(&b.package, &b.function)));
    costs
}

/// Assemble the full report for a run
pub fn build_report(
    model: &CostModel,
    counters: AggregateCounters,
    skipped: &[(PathBuf, String)],
    multiplier: u32,
) -> CostReport {
    CostReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        counters,
        skipped_files: skipped
            .iter()
            .map(|(path, reason)| SkippedFile {
                path: path.clone(),
                reason: reason.clone(),
            })
            .collect(),
        baseline: model.coefficients.as_ref().map(|c| c.baseline),
        multiplier,
        detailed: detailed_rows(model),
        summary: summary_rows(model),
        native_costs: native_costs(model),
        size_models: model.size_models.clone(),
    }
}
