//! Output writers for harmonized tables.

pub mod common;
pub mod csv;
pub mod error;
pub mod manifest;

pub use common::{csv_file_name, ensure_dir, ensure_parent_dir};
pub use csv::{write_csv, write_table};
pub use error::{OutputError, Result};
pub use manifest::{MANIFEST_FILE, RunManifest, WrittenFile, compute_file_sha256, write_manifest};
