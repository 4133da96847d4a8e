//! CSV export of the official classification.
//!
//! The export payload is the base table itself: header row
//! `Position,Driver,Team,Status,Points,Laps`, one data row per entrant,
//! UTF-8, in classification order. Rankings are never exported.

use crate::models::{format_points, ResultRow, SessionMeta};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Column names, in export order.
const CSV_HEADER: [&str; 6] = ["Position", "Driver", "Team", "Status", "Points", "Laps"];

/// Write the classification as CSV to any writer.
pub fn write_csv<W: Write>(rows: &[ResultRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    for row in rows {
        csv_writer
            .write_record([
                row.position_label(),
                row.driver.clone(),
                row.team.clone(),
                row.status.clone(),
                format_points(row.points),
                row.laps.to_string(),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", row.driver))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Render the classification as an in-memory CSV string.
#[allow(dead_code)] // Utility for callers that hold the payload in memory
pub fn csv_string(rows: &[ResultRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}

/// Write the classification CSV to a file.
pub fn write_csv_file(rows: &[ResultRow], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_csv(rows, file)
}

/// Default export filename for a session, e.g. `f1_2023_round_7_R.csv`.
pub fn suggested_filename(meta: &SessionMeta) -> String {
    format!(
        "f1_{}_round_{}_{}.csv",
        meta.season,
        meta.round,
        meta.session_kind.code()
    )
}
