//! Tabular export of stored observations
//!
//! Writes `ExportRow`s as CSV. The header is always written, so an empty
//! window still yields a well-formed file.

use std::io::Write;

use domain::{ExportRow, WeatherRecord};
use thiserror::Error;
use tracing::debug;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write rows as CSV with the `ExportRow::COLUMNS` header
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(ExportRow::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    debug!(rows = rows.len(), "Wrote CSV export");
    Ok(())
}

/// Write records as CSV, in the order given
pub fn write_records_csv<W: Write>(records: &[WeatherRecord], writer: W) -> Result<(), ExportError> {
    let rows: Vec<ExportRow> = records.iter().map(WeatherRecord::to_export_row).collect();
    write_csv(&rows, writer)
}

/// Render rows to an in-memory CSV string
pub fn to_csv_string(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
