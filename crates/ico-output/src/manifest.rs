//! Run manifest: every file a run wrote, with row counts and checksums.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::common::ensure_parent_dir;
use crate::error::{OutputError, Result};

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = "run_manifest.json";

const BUFFER_SIZE: usize = 65536;

/// Compute the SHA256 hash of a file as lowercase hex.
pub fn compute_file_sha256(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|source| OutputError::io(path, source))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|source| OutputError::io(path, source))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hex_hash = hex::encode(hasher.finalize());
    debug!(path = %path.display(), sha256 = %hex_hash, "checksum computed");
    Ok(hex_hash)
}

/// One file written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub tool: String,
    pub version: String,
    pub generated_at: String,
    pub interim: Vec<WrittenFile>,
    pub outputs: Vec<WrittenFile>,
    pub skipped: Vec<String>,
}

impl RunManifest {
    /// Stamps the files of one run with the producing tool and the current time.
    pub fn new(
        tool: &str,
        version: &str,
        interim: Vec<WrittenFile>,
        outputs: Vec<WrittenFile>,
        skipped: Vec<String>,
    ) -> Self {
        Self {
            tool: tool.to_string(),
            version: version.to_string(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            interim,
            outputs,
            skipped,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.interim.iter().chain(&self.outputs).map(|f| f.rows).sum()
    }
}

/// Writes the manifest as pretty JSON.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json).map_err(|source| OutputError::io(path, source))?;
    info!(
        path = %path.display(),
        files = manifest.interim.len() + manifest.outputs.len(),
        "wrote run manifest"
    );
    Ok(())
}
