//! Readers that turn spreadsheets and CSV exports into [`RawTable`]s.
//!
//! Row indices of the returned table are absolute sheet rows: when a
//! worksheet's used range does not start at `A1`, leading rows and columns
//! are padded with empty cells so that layout indices stay stable. The CSV
//! reader skips empty lines, so each record is placed at the row of the line
//! it starts on and the skipped lines come back as blank rows.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::debug;

use ico_model::{RawCell, RawTable};

use crate::discovery::extension;
use crate::error::{IngestError, Result};

/// Reads the first worksheet of a workbook, or a CSV file, as a raw table.
pub fn read_raw_table(path: &Path, name: &str) -> Result<RawTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let table = match extension(path).as_deref() {
        Some("csv") => read_csv_raw(path, name)?,
        Some("xlsx" | "xls" | "ods") => read_workbook_raw(path, name)?,
        _ => {
            return Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "read raw table"
    );
    Ok(table)
}

fn read_workbook_raw(path: &Path, name: &str) -> Result<RawTable> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_error(e.to_string()))?;

    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    let mut rows: Vec<Vec<RawCell>> = vec![Vec::new(); row_offset];
    for sheet_row in range.rows() {
        let mut row = vec![RawCell::Empty; col_offset];
        row.extend(sheet_row.iter().map(cell_from_data));
        rows.push(row);
    }
    Ok(RawTable::new(name, rows))
}

fn cell_from_data(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Float(value) => RawCell::Number(*value),
        Data::String(value) => RawCell::Text(value.clone()),
        other => RawCell::Text(other.to_string()),
    }
}

fn read_csv_raw(path: &Path, name: &str) -> Result<RawTable> {
    let csv_error = |message: String| IngestError::CsvParse {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(e.to_string()))?;

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(e.to_string()))?;
        if let Some(position) = record.position() {
            // Lines are 1-based.
            let sheet_row = usize::try_from(position.line().saturating_sub(1))
                .map_err(|e| csv_error(e.to_string()))?;
            if sheet_row > rows.len() {
                rows.resize(sheet_row, Vec::new());
            }
        }
        let row = record
            .iter()
            .map(|value| {
                let value = value.trim_matches('\u{feff}');
                if value.trim().is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(value.to_string())
                }
            })
            .collect();
        rows.push(row);
    }
    Ok(RawTable::new(name, rows))
}
