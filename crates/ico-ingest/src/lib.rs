//! Input loading for the harmonization pipeline.
//!
//! This crate is the file-I/O boundary on the input side. It carries no
//! domain logic:
//!
//! - **Discovery**: find source spreadsheets and derive their source keys
//! - **Workbooks**: read the first worksheet of an xlsx/xls/ods file, or a
//!   CSV export, into an untyped [`ico_model::RawTable`]
//! - **Population**: load the external demographic table
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ico_ingest::{discover_sources, read_raw_table};
//!
//! for file in discover_sources(Path::new("data/raw"))? {
//!     let table = read_raw_table(&file.path, &file.key)?;
//!     println!("{}: {} rows", file.key, table.height());
//! }
//! ```

mod discovery;
mod error;
mod population;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{
    DiscoveredFile, SUPPORTED_EXTENSIONS, discover_sources, list_source_files, source_key,
};

// === Readers ===
pub use population::{JAN_COLUMN, JULY_COLUMN, LOCATION_COLUMN, TIME_COLUMN, load_population};
pub use workbook::read_raw_table;
