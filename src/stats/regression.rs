//! Linear cost models for size-dependent operations.
//!
//! Signatures that share a base operation and differ only in their size
//! segment form a family. Each family is fitted with ordinary least
//! squares on the single predictor `size`:
//!
//! ```text
//! instructions ≈ slope * size + intercept
//! ```

use super::summary::CostModelRow;
use crate::aggregator::AggregateTable;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fitted OLS line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,

    /// Number of points the line was fitted on
    pub points: usize,
}

impl LinearFit {
    pub fn predict(&self, size: f64) -> f64 {
        self.slope * size + self.intercept
    }
}

/// Model of one size family; `fit` is `None` when the data could not
/// support a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeModel {
    pub family: String,
    pub fit: Option<LinearFit>,
}

/// Ordinary least squares on `(x, y)` points
///
/// Returns `None` for fewer than two points or when every `x` is equal.
pub fn fit_linear(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = points.iter().map(|p| (p.1 - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|p| (p.1 - (slope * p.0 + intercept)).powi(2))
        .sum();

    // A flat family fitted exactly explains all of its (zero) variance.
    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        points: points.len(),
    })
}

/// Fit every size family found among `rows`
///
/// With `raw_samples` each recorded sample is a point; otherwise each
/// signature contributes one `(size, representative_cost)` point.
pub fn fit_size_families(
    rows: &[CostModelRow],
    table: &AggregateTable,
    raw_samples: bool,
) -> Vec<SizeModel> {
    let mut families: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();

    for row in rows {
        let Some(size) = row.signature.size else {
            continue;
        };
        let points = families.entry(row.signature.base.as_str()).or_default();

        if raw_samples {
            if let Some(entry) = table.get(&row.signature.key) {
                points.extend(entry.samples.iter().map(|&s| (size as f64, s as f64)));
            }
        } else {
            points.push((size as f64, row.representative_cost as f64));
        }
    }

    families
        .into_iter()
        .map(|(family, points)| {
            let fit = fit_linear(&points);
            match &fit {
                Some(f) => debug!(
                    "Fitted {}: slope {:.4}, intercept {:.2}, R² {:.4}",
                    family, f.slope, f.intercept, f.r_squared
                ),
                None => warn!(
                    "Not enough size points to model {} ({} points)",
                    family,
                    points.len()
                ),
            }
            SizeModel {
                family: family.to_string(),
                fit,
            }
        })
        .collect()
}
