//! CSV export and console rendering of projection rows

use crate::error::Result;
use crate::projection::MonthResult;
use std::fmt::Write as _;
use std::io::Write;

const CSV_HEADER: [&str; 17] = [
    "Month",
    "Date",
    "PeriodId",
    "StartingCash",
    "StartingUnits",
    "StartingSavings",
    "StartingDebt",
    "Income",
    "Contribution",
    "DebtPaid",
    "SavingsAdded",
    "UnitsPurchased",
    "UnitsCost",
    "EndingCash",
    "EndingUnits",
    "EndingSavings",
    "EndingDebt",
];

/// Write every row as CSV with a header line
pub fn write_results_csv<W: Write>(writer: W, results: &[MonthResult]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for row in results {
        csv.write_record(&[
            row.month.to_string(),
            row.date.format("%Y-%m-%d").to_string(),
            row.config_id.to_string(),
            row.starting_cash.to_plain_string(),
            row.starting_units.to_string(),
            row.starting_savings.to_plain_string(),
            row.starting_debt.to_plain_string(),
            row.income_amount.to_plain_string(),
            row.contribution.to_plain_string(),
            row.debt_paid.to_plain_string(),
            row.savings_added.to_plain_string(),
            row.units_purchased.to_string(),
            row.units_cost.to_plain_string(),
            row.ending_cash.to_plain_string(),
            row.ending_units.to_string(),
            row.ending_savings.to_plain_string(),
            row.ending_debt.to_plain_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Fixed-width table of the first `limit` rows
pub fn render_table(results: &[MonthResult], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>8} {:>16}",
        "Month", "Date", "Contribution", "Interest", "Savings", "Start Cash", "End Cash", "Units", "Units Value"
    );
    let _ = writeln!(out, "{}", "-".repeat(112));

    for row in results.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:>5} {:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>8} {:>16}",
            row.month,
            row.date.format("%m/%y").to_string(),
            row.contribution,
            row.income_amount,
            row.ending_savings,
            row.starting_cash,
            row.ending_cash,
            row.ending_units,
            row.units_value(),
        );
    }

    if results.len() > limit {
        let _ = writeln!(out, "... ({} more months)", results.len() - limit);
    }

    out
}
