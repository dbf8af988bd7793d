//! Delimited (CSV) renderings of the report tables.

use super::report::{NativeCost, SummaryRow};
use crate::utils::error::OutputError;
use csv::Writer;

/// Summary table as CSV, header included
pub fn summary_to_csv(rows: &[SummaryRow]) -> Result<String, OutputError> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "signature",
        "representative_cost",
        "method",
        "coefficient",
        "error",
    ])?;

    for row in rows {
        wtr.write_record([
            row.rank.to_string(),
            row.signature.clone(),
            row.representative_cost.to_string(),
            row.method.to_string(),
            row.coefficient.map(|c| c.to_string()).unwrap_or_default(),
            row.error.map(|e| e.to_string()).unwrap_or_default(),
        ])?;
    }

    into_string(wtr)
}

/// Native function base costs as `package,function,cost` lines, no header
pub fn native_costs_to_csv(costs: &[NativeCost]) -> Result<String, OutputError> {
    let mut wtr = Writer::from_writer(vec![]);

    for cost in costs {
        wtr.write_record([
            cost.package.as_str(),
            cost.function.as_str(),
            cost.cost.to_string().as_str(),
        ])?;
    }

    into_string(wtr)
}

/// **Private** - flush the writer and take its buffer
fn into_string(wtr: Writer<Vec<u8>>) -> Result<String, OutputError> {
    let data = wtr
        .into_inner()
        .map_err(|e| OutputError::WriteFailed(e.into_error()))?;
    Ok(String::from_utf8(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CostMethod;

    #[test]
    fn test_summary_csv() {
        let rows = vec![
            SummaryRow {
                rank: 1,
                signature: "kernel_lock_substate::Main::Field(0, 1)".to_string(),
                representative_cost: 50,
                method: CostMethod::Median,
                coefficient: Some(80),
                error: Some(0.0),
            },
            SummaryRow {
                rank: 2,
                signature: "kernel_drop_node".to_string(),
                representative_cost: -3,
                method: CostMethod::Max,
                coefficient: None,
                error: None,
            },
        ];

        let out = summary_to_csv(&rows).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "rank,signature,representative_cost,method,coefficient,error");
        assert_eq!(lines[1], "1,\"kernel_lock_substate::Main::Field(0, 1)\",50,median,80,0");
        assert_eq!(lines[2], "2,kernel_drop_node,-3,max,,");
    }

    #[test]
    fn test_native_costs_csv() {
        let costs = vec![NativeCost {
            package: "Faucet".to_string(),
            function: "free".to_string(),
            cost: 900,
        }];
        assert_eq!(native_costs_to_csv(&costs).unwrap(), "Faucet,free,900\n");
        assert_eq!(native_costs_to_csv(&[]).unwrap(), "");
    }
}
