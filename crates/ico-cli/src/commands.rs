use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::info_span;

use ico_cli::pipeline::{RunConfig, load_options, run_pipeline};
use ico_cli::types::RunResult;
use ico_ingest::discover_sources;

use crate::cli::{RunArgs, SourcesArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn run_harmonize(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("run", input_dir = %args.input_dir.display());
    let _guard = span.enter();

    let mut options = load_options(args.config.as_deref())?;
    // Command-line flags win over the config file.
    if let Some(file) = &args.population_file {
        options.population_file.clone_from(file);
    }
    if args.no_interim {
        options.write_interim = false;
    }

    let config = RunConfig {
        input_dir: args.input_dir.clone(),
        external_dir: args.external_dir.clone(),
        interim_dir: args.interim_dir.clone(),
        output_dir: args.output_dir.clone(),
        options,
        dry_run: args.dry_run,
    };
    run_pipeline(&config)
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let files = discover_sources(&args.input_dir)
        .with_context(|| format!("discover sources in {}", args.input_dir.display()))?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Key"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for file in files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path.display().to_string());
        let source = match file.kind {
            Some(kind) if kind.is_required() => Cell::new(kind),
            Some(kind) => Cell::new(format!("{kind} (optional)")),
            None => dim_cell("ignored"),
        };
        table.add_row(vec![Cell::new(name), Cell::new(file.key), source]);
    }
    println!("{table}");
    Ok(())
}
