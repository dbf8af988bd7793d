//! Descriptive statistics per signature.

use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count, range and central tendency of one signature's samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub min: i64,
    pub max: i64,

    /// Arithmetic mean, rounded to the nearest integer
    pub mean: i64,

    /// Median, rounded to the nearest integer; for an even count the
    /// two middle values are averaged
    pub median: i64,
}

/// Summarize a sample multiset; `None` when it is empty
pub fn summarize(samples: &[i64]) -> Option<SampleSummary> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let sum: i128 = sorted.iter().map(|&s| i128::from(s)).sum();
    let mean = (sum as f64 / count as f64).round() as i64;

    let mid = count / 2;
    let median = if count % 2 == 1 {
        sorted[mid]
    } else {
        let pair = i128::from(sorted[mid - 1]) + i128::from(sorted[mid]);
        (pair as f64 / 2.0).round() as i64
    };

    Some(SampleSummary {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        mean,
        median,
    })
}

/// Statistic used as a signature's representative cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMethod {
    Median,
    Max,
}

impl CostMethod {
    pub fn pick(&self, summary: &SampleSummary) -> i64 {
        match self {
            CostMethod::Median => summary.median,
            CostMethod::Max => summary.max,
        }
    }
}

impl fmt::Display for CostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostMethod::Median => f.write_str("median"),
            CostMethod::Max => f.write_str("max"),
        }
    }
}

/// Per-signature cost, built once all files are ingested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModelRow {
    pub signature: Signature,
    pub summary: SampleSummary,
    pub representative_cost: i64,
    pub method: CostMethod,

    /// Linear size model of the signature's family, when one was fitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression: Option<super::regression::LinearFit>,
}
