//! Source file discovery for the raw input directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use ico_model::SourceKind;

use crate::error::{IngestError, Result};

/// File extensions read as workbooks or CSV exports.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "ods", "csv"];

static SECTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9][a-z] - ").expect("valid section prefix pattern"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("valid non-word pattern"));

/// A source file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// Key derived from the file stem, e.g. `total_production`.
    pub key: String,
    /// The known source this key names, if any.
    pub kind: Option<SourceKind>,
}

/// Derives the source key from a file stem.
///
/// Drops a leading `"1a - "` section prefix, collapses non-word runs to `_`
/// and lower-cases: `"4b - Non-member re-exports"` → `non_member_re_exports`.
pub fn source_key(stem: &str) -> String {
    let without_prefix = SECTION_PREFIX.replace(stem, "");
    NON_WORD
        .replace_all(without_prefix.trim(), "_")
        .to_lowercase()
}

/// Lists supported files in a directory, sorted by file name.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // Skip spreadsheet lock files such as "~$1a - Total production.xlsx"
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$") || name.starts_with('.'));
        if hidden {
            continue;
        }
        if is_supported(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Lists supported files and classifies them by source key.
///
/// Files whose key names no known source are returned with `kind: None`.
pub fn discover_sources(dir: &Path) -> Result<Vec<DiscoveredFile>> {
    let files = list_source_files(dir)?;
    let mut discovered = Vec::with_capacity(files.len());
    for path in files {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let key = source_key(stem);
        let kind = key.parse::<SourceKind>().ok();
        if kind.is_none() {
            debug!(path = %path.display(), key = %key, "ignoring unrecognized source file");
        }
        discovered.push(DiscoveredFile { path, key, kind });
    }
    Ok(discovered)
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn is_supported(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_key_strips_section_prefix() {
        assert_eq!(source_key("1a - Total production"), "total_production");
        assert_eq!(source_key("2c - Gross opening stocks"), "gross_opening_stocks");
        assert_eq!(source_key("4b - Non-member re-exports"), "non_member_re_exports");
        assert_eq!(source_key("Exports - crop year"), "exports_crop_year");
        assert_eq!(source_key("imports"), "imports");
    }

    #[test]
    fn test_discover_sources_classifies_keys() {
        let dir = TempDir::new().unwrap();
        for name in ["1a - Total production.csv", "notes.csv", "README.txt", "~$lock.xlsx"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }

        let found = discover_sources(dir.path()).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].key, "total_production");
        assert_eq!(found[0].kind, Some(SourceKind::TotalProduction));
        assert_eq!(found[1].key, "notes");
        assert_eq!(found[1].kind, None);
    }

    #[test]
    fn test_list_source_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("imports.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_source_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
