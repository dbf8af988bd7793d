//! Plain-text table rendering.
//!
//! Column widths adapt to the longest cell so tables stay readable for
//! long signatures.

use super::report::{DetailedRow, SummaryRow};
use crate::stats::SizeModel;

/// Render rows of cells as an aligned table with a header rule
///
/// The first column is left-aligned, all others right-aligned.
fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{:<w$}", cell, w = w)
                } else {
                    format!("{:>w$}", cell, w = w)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![format_row(&header_cells)];
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|r| format_row(r)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Detailed table: signature, count, min, max, mean, median
pub fn render_detailed_table(rows: &[DetailedRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.signature.clone(),
                r.count.to_string(),
                r.min.to_string(),
                r.max.to_string(),
                r.mean.to_string(),
                r.median.to_string(),
            ]
        })
        .collect();

    render_table(
        &["Signature", "Count", "Min", "Max", "Mean", "Median"],
        &cells,
    )
}

/// Summary table: rank, signature, cost, method, coefficient, error
pub fn render_summary_table(rows: &[SummaryRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.rank.to_string(),
                r.signature.clone(),
                r.representative_cost.to_string(),
                r.method.to_string(),
                r.coefficient.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                r.error.map(|e| format!("{:.3}", e)).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    render_table(
        &["Rank", "Signature", "Cost", "Method", "Coefficient", "Error"],
        &cells,
    )
}

/// One line per size family
pub fn render_size_models(models: &[SizeModel]) -> String {
    models
        .iter()
        .map(|m| match &m.fit {
            Some(fit) => format!(
                "{}: instructions = {:.6} * size + {:.3} (R² = {:.6}, points = {})\n",
                m.family, fit.slope, fit.intercept, fit.r_squared, fit.points
            ),
            None => format!("{}: unavailable\n", m.family),
        })
        .collect()
}
