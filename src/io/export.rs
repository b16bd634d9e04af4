//! CSV export for allocation recommendations.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::invest::AllocationResult;

/// Column header for the recommendation export.
const HEADER: &str = "project_id,project_name,energy_type,recommended_shares,\
                       investment_amount,annual_benefit,payback_years,capacity,capacity_unit";

/// Exports the recommendations of `result` to a CSV file at the given path.
///
/// Writes a header row followed by one row per recommendation, in greedy
/// order. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &AllocationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes the recommendations as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &AllocationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in &result.recommendations {
        wtr.write_record(&[
            r.project_id.clone(),
            r.project_name.clone(),
            r.energy_type.to_string(),
            r.recommended_shares.to_string(),
            format!("{:.2}", r.investment_amount),
            format!("{:.2}", r.annual_benefit),
            format!("{:.2}", r.payback_years),
            format!("{:.3}", r.capacity),
            r.capacity_unit.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
