//! Tabular output of aggregated result rows.

use std::io::Write;

use stackrank_types::{AggregateRow, RunConfiguration};

use crate::error::CliError;

/// Column names in output order.
pub const COLUMNS: [&str; 8] = [
    "sample_size",
    "underestimate_coefficient",
    "correct_coefficient",
    "overestimate_coefficient",
    "average_score",
    "average_underestimates",
    "average_correct",
    "average_overestimates",
];

/// Render a float the way a spreadsheet round-trips it: shortest exact
/// form, always with a decimal point.
fn format_float(value: f64) -> String {
    format!("{value:?}")
}

/// The CSV fields of one row, in [`COLUMNS`] order.
pub fn csv_fields(row: &AggregateRow<RunConfiguration>) -> [String; 8] {
    let payoff = row.key.payoff;
    [
        row.key.sample_size.to_string(),
        format_float(payoff.underestimate),
        format_float(payoff.correct),
        format_float(payoff.overestimate),
        format_float(row.average_score),
        format_float(row.average_underestimates),
        format_float(row.average_correct),
        format_float(row.average_overestimates),
    ]
}

/// Write rows as comma-separated values, optionally preceded by a header.
pub fn write_csv<W: Write>(
    out: &mut W,
    rows: &[AggregateRow<RunConfiguration>],
    header: bool,
) -> Result<(), CliError> {
    if header {
        writeln!(out, "{}", COLUMNS.join(","))?;
    }
    for row in rows {
        writeln!(out, "{}", csv_fields(row).join(","))?;
    }
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json<W: Write>(
    out: &mut W,
    rows: &[AggregateRow<RunConfiguration>],
) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)?;
    Ok(())
}
