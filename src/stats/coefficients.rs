//! Normalized integer cost coefficients.
//!
//! Every representative cost is expressed relative to the cheapest
//! operation (the baseline) as `coefficient * baseline / multiplier`,
//! giving a small-integer cost-unit table a metering system can consume.

use super::summary::CostModelRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coefficient and rounding error for one signature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub coefficient: i64,

    /// `representative_cost - coefficient * baseline / multiplier`
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCoefficientTable {
    /// Minimum positive representative cost across all signatures
    pub baseline: i64,
    pub multiplier: u32,
    pub entries: BTreeMap<String, CoefficientEntry>,
}

impl CostCoefficientTable {
    pub fn get(&self, key: &str) -> Option<&CoefficientEntry> {
        self.entries.get(key)
    }
}

/// Derive the coefficient table; `None` when no signature has a positive
/// representative cost
///
/// Coefficients are clamped at zero, so a signature with a negative
/// representative cost carries its whole cost as error.
pub fn derive_coefficients(rows: &[CostModelRow], multiplier: u32) -> Option<CostCoefficientTable> {
    let baseline = rows
        .iter()
        .map(|r| r.representative_cost)
        .filter(|&c| c > 0)
        .min()?;

    let unit = baseline as f64 / f64::from(multiplier);
    let entries = rows
        .iter()
        .map(|row| {
            let cost = row.representative_cost as f64;
            let coefficient = (cost / unit).round().max(0.0) as i64;
            let entry = CoefficientEntry {
                coefficient,
                error: cost - coefficient as f64 * unit,
            };
            (row.signature.key.clone(), entry)
        })
        .collect();

    Some(CostCoefficientTable {
        baseline,
        multiplier,
        entries,
    })
}
