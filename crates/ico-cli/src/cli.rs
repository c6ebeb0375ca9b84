//! CLI argument definitions for the harmonizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ico_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "ico-harmonize",
    version,
    about = "Harmonize coffee trade-statistics spreadsheets into analysis-ready tables",
    long_about = "Harmonize coffee trade-statistics spreadsheets into analysis-ready tables.\n\n\
                  Normalizes producer, importer, non-member and price sheets into long\n\
                  tables, splits merged reporting entities, rolls producer stocks forward\n\
                  and overlays population figures."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write interim and output tables.
    Run(RunArgs),

    /// List the source files found in an input directory.
    Sources(SourcesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding the raw source spreadsheets.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory holding the external population table.
    #[arg(value_name = "EXTERNAL_DIR")]
    pub external_dir: PathBuf,

    /// Directory for per-source normalized tables.
    #[arg(value_name = "INTERIM_DIR")]
    pub interim_dir: PathBuf,

    /// Directory for the published tables.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Population file name inside EXTERNAL_DIR.
    #[arg(long = "population-file", value_name = "FILE")]
    pub population_file: Option<String>,

    /// JSON file with pipeline option overrides.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip writing interim tables.
    #[arg(long = "no-interim")]
    pub no_interim: bool,

    /// Run every stage without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SourcesArgs {
    /// Directory holding the raw source spreadsheets.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
