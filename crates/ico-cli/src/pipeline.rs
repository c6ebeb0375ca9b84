//! Run orchestration with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: discover source sheets and read them with the population table
//! 2. **Harmonize**: normalize, split, roll forward and assemble (pure, no I/O)
//! 3. **Output**: write interim and output CSVs plus the run manifest
//!
//! All reads happen before the engine call and all writes after it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use ico_ingest::{DiscoveredFile, discover_sources, load_population, read_raw_table};
use ico_model::PipelineOptions;
use ico_output::{MANIFEST_FILE, RunManifest, WrittenFile, ensure_dir, write_manifest, write_table};
use ico_transform::{HarmonizedTables, NamedFrame, SourceTables, harmonize};

use crate::types::{RunResult, Stage, TableSummary};

/// Name recorded in the run manifest.
pub const TOOL_NAME: &str = "ico-harmonize";

/// Directories and options of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub external_dir: PathBuf,
    pub interim_dir: PathBuf,
    pub output_dir: PathBuf,
    pub options: PipelineOptions,
    /// Run every stage but write nothing.
    pub dry_run: bool,
}

/// Loads pipeline options from a JSON file, or the defaults without one.
pub fn load_options(config: Option<&Path>) -> Result<PipelineOptions> {
    let Some(path) = config else {
        return Ok(PipelineOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("parse config {}", path.display()))?;
    debug!(path = %path.display(), ?options, "loaded pipeline options");
    Ok(options)
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub sources: SourceTables,
    /// Files read into `sources`.
    pub used: Vec<DiscoveredFile>,
    /// Unrecognized files and duplicates of an already read source.
    pub ignored: Vec<DiscoveredFile>,
}

/// Reads every recognized source sheet and the population table.
pub fn ingest(
    input_dir: &Path,
    external_dir: &Path,
    options: &PipelineOptions,
) -> Result<IngestResult> {
    let span = info_span!("ingest", input_dir = %input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let population_path = external_dir.join(&options.population_file);
    let population = load_population(&population_path)
        .with_context(|| format!("load population table {}", population_path.display()))?;
    let mut sources = SourceTables::new(population);

    let discovered = discover_sources(input_dir)
        .with_context(|| format!("discover sources in {}", input_dir.display()))?;
    let mut used = Vec::new();
    let mut ignored = Vec::new();
    for file in discovered {
        let Some(kind) = file.kind else {
            ignored.push(file);
            continue;
        };
        if sources.get(kind).is_some() {
            warn!(
                source = %kind,
                path = %file.path.display(),
                "source already read from another file, ignoring"
            );
            ignored.push(file);
            continue;
        }
        let table = read_raw_table(&file.path, kind.key())
            .with_context(|| format!("read {}", file.path.display()))?;
        debug!(source = %kind, rows = table.height(), "source loaded");
        sources.insert(kind, table);
        used.push(file);
    }

    info!(
        sources = used.len(),
        ignored = ignored.len(),
        population_rows = sources.population.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        sources,
        used,
        ignored,
    })
}

// ============================================================================
// Stage 3: Output
// ============================================================================

/// Files written by the output stage.
#[derive(Debug, Default)]
pub struct OutputResult {
    pub interim: Vec<WrittenFile>,
    pub outputs: Vec<WrittenFile>,
    pub manifest: Option<PathBuf>,
}

/// Writes the harmonized tables and, when enabled, the run manifest.
pub fn write_outputs(config: &RunConfig, tables: &HarmonizedTables) -> Result<OutputResult> {
    let span = info_span!("output", output_dir = %config.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut result = OutputResult::default();
    if config.options.write_interim {
        result.interim = write_frames(&config.interim_dir, &tables.interim)?;
    }
    result.outputs = write_frames(&config.output_dir, &tables.outputs)?;

    if config.options.write_manifest {
        let path = config.output_dir.join(MANIFEST_FILE);
        let manifest = RunManifest::new(
            TOOL_NAME,
            env!("CARGO_PKG_VERSION"),
            result.interim.clone(),
            result.outputs.clone(),
            tables.skipped.clone(),
        );
        write_manifest(&path, &manifest)
            .with_context(|| format!("write manifest {}", path.display()))?;
        result.manifest = Some(path);
    }

    info!(
        files = result.interim.len() + result.outputs.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(result)
}

fn write_frames(dir: &Path, frames: &[NamedFrame]) -> Result<Vec<WrittenFile>> {
    ensure_dir(dir).with_context(|| format!("create directory {}", dir.display()))?;
    frames
        .iter()
        .map(|named| {
            write_table(dir, &named.name, &named.frame)
                .with_context(|| format!("write table {}", named.name))
        })
        .collect()
}

// ============================================================================
// Full run
// ============================================================================

/// Runs ingest, harmonize and output in order.
pub fn run_pipeline(config: &RunConfig) -> Result<RunResult> {
    let start = Instant::now();
    let ingested = ingest(&config.input_dir, &config.external_dir, &config.options)?;
    let tables = harmonize(&ingested.sources, &config.options).context("harmonize sources")?;

    let written = if config.dry_run {
        info!("dry run, no files written");
        OutputResult::default()
    } else {
        write_outputs(config, &tables)?
    };

    let mut summaries = summarize(Stage::Interim, &tables.interim, &written.interim);
    summaries.extend(summarize(Stage::Output, &tables.outputs, &written.outputs));

    info!(
        tables = summaries.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        output_dir: config.output_dir.clone(),
        tables: summaries,
        skipped: tables.skipped,
        manifest: written.manifest,
        dry_run: config.dry_run,
    })
}

fn summarize(stage: Stage, frames: &[NamedFrame], written: &[WrittenFile]) -> Vec<TableSummary> {
    frames
        .iter()
        .map(|named| TableSummary {
            name: named.name.clone(),
            stage,
            rows: named.frame.height(),
            columns: named.frame.width(),
            path: written
                .iter()
                .find(|file| file.name == named.name)
                .map(|file| file.path.clone()),
        })
        .collect()
}
