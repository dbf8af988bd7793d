//! Statistics, size regression and cost coefficients.
//!
//! Turns a finalized aggregate into the cost model:
//! - per-signature summary and representative cost
//! - one linear model per size-dependent family
//! - a normalized coefficient table against the cheapest operation

pub mod coefficients;
pub mod regression;
pub mod summary;

pub use coefficients::{derive_coefficients, CoefficientEntry, CostCoefficientTable};
pub use regression::{fit_linear, fit_size_families, LinearFit, SizeModel};
pub use summary::{summarize, CostMethod, CostModelRow, SampleSummary};

use crate::aggregator::AggregateTable;
use crate::utils::config::AnalysisConfig;
use log::info;

/// Complete cost model of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    /// One row per signature, ordered by signature key
    pub rows: Vec<CostModelRow>,

    /// One entry per size family, ordered by family name
    pub size_models: Vec<SizeModel>,

    /// `None` when no signature has a positive representative cost
    pub coefficients: Option<CostCoefficientTable>,
}

/// Build the cost model from a finalized aggregate
///
/// **Public** - main entry point for statistics
pub fn build_cost_model(table: &AggregateTable, config: &AnalysisConfig) -> CostModel {
    let mut rows: Vec<CostModelRow> = table
        .entries
        .values()
        .filter_map(|entry| {
            let summary = summarize(&entry.samples)?;
            let method = if config.is_cache_sensitive(entry.signature.tag()) {
                CostMethod::Max
            } else {
                CostMethod::Median
            };
            Some(CostModelRow {
                signature: entry.signature.clone(),
                summary,
                representative_cost: method.pick(&summary),
                method,
                regression: None,
            })
        })
        .collect();

    let size_models = fit_size_families(&rows, table, config.regression_on_raw_samples);

    for row in rows.iter_mut().filter(|r| r.signature.is_size_dependent()) {
        row.regression = size_models
            .iter()
            .find(|m| m.family == row.signature.base)
            .and_then(|m| m.fit);
    }

    let coefficients = derive_coefficients(&rows, config.multiplier);
    if let Some(c) = &coefficients {
        info!(
            "Cost model: {} signatures, {} size families, baseline {} instructions",
            rows.len(),
            size_models.len(),
            c.baseline
        );
    }

    CostModel {
        rows,
        size_models,
        coefficients,
    }
}
