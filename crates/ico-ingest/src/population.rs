//! Loader for the external demographic table.

use std::path::Path;
use std::sync::Arc;

use csv::ReaderBuilder;
use polars::prelude::{CsvReadOptions, DataType, PlSmallStr, SerReader};
use tracing::{debug, warn};

use ico_model::PopulationRecord;

use crate::error::{IngestError, Result};

/// Source column holding the entity name.
pub const LOCATION_COLUMN: &str = "Location";
/// Source column holding the year.
pub const TIME_COLUMN: &str = "Time";
/// Source column holding the 1 January population.
pub const JAN_COLUMN: &str = "TPopulation1Jan";
/// Source column holding the 1 July population.
pub const JULY_COLUMN: &str = "TPopulation1July";

const POPULATION_COLUMNS: [&str; 4] = [LOCATION_COLUMN, TIME_COLUMN, JAN_COLUMN, JULY_COLUMN];

/// Reads the population CSV, keeping only the four columns the join needs.
///
/// Rows without a location or year are dropped; unparseable population
/// values become `None`.
pub fn load_population(path: &Path) -> Result<Vec<PopulationRecord>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    check_population_header(path)?;

    let columns: Arc<[PlSmallStr]> = Arc::from(POPULATION_COLUMNS.map(PlSmallStr::from_static));
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_columns(Some(columns))
        .with_infer_schema_length(Some(10_000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let location = df.column(LOCATION_COLUMN)?.cast(&DataType::String)?;
    let time = df.column(TIME_COLUMN)?.cast(&DataType::Int64)?;
    let jan = df.column(JAN_COLUMN)?.cast(&DataType::Float64)?;
    let july = df.column(JULY_COLUMN)?.cast(&DataType::Float64)?;

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for (((country, year), boy), mid) in location
        .str()?
        .into_iter()
        .zip(time.i64()?.into_iter())
        .zip(jan.f64()?.into_iter())
        .zip(july.f64()?.into_iter())
    {
        let (Some(country), Some(year)) = (country, year) else {
            skipped += 1;
            continue;
        };
        let Ok(year) = i32::try_from(year) else {
            skipped += 1;
            continue;
        };
        records.push(PopulationRecord {
            country: country.trim().to_string(),
            year,
            population_boy: boy,
            population_mid: mid,
        });
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "population rows without location or year");
    }
    debug!(path = %path.display(), rows = records.len(), "loaded population table");
    Ok(records)
}

fn check_population_header(path: &Path) -> Result<()> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let headers = reader.headers().map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    for column in POPULATION_COLUMNS {
        if !headers
            .iter()
            .any(|header| header.trim_matches('\u{feff}').trim() == column)
        {
            return Err(IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}
