//! CSV writing of harmonized tables.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::debug;

use crate::common::{csv_file_name, ensure_parent_dir};
use crate::error::{OutputError, Result};
use crate::manifest::{WrittenFile, compute_file_sha256};

/// Writes `frame` as a headed CSV file; nulls become empty fields.
pub fn write_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut file = File::create(path).map_err(|source| OutputError::io(path, source))?;
    let mut frame = frame.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| OutputError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = frame.height(), "wrote CSV");
    Ok(())
}

/// Writes the table `name` into `dir` and records it for the manifest.
pub fn write_table(dir: &Path, name: &str, frame: &DataFrame) -> Result<WrittenFile> {
    let path: PathBuf = dir.join(csv_file_name(name));
    write_csv(&path, frame)?;
    Ok(WrittenFile {
        name: name.to_string(),
        sha256: compute_file_sha256(&path)?,
        rows: frame.height(),
        columns: frame.width(),
        path,
    })
}
