use std::fmt;
use std::path::PathBuf;

/// Where a table lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Interim,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interim => f.write_str("interim"),
            Self::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableSummary {
    pub name: String,
    pub stage: Stage,
    pub rows: usize,
    pub columns: usize,
    /// `None` when nothing was written (dry run or interim disabled).
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub tables: Vec<TableSummary>,
    pub skipped: Vec<String>,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunResult {
    pub fn total_rows(&self, stage: Stage) -> usize {
        self.tables
            .iter()
            .filter(|table| table.stage == stage)
            .map(|table| table.rows)
            .sum()
    }
}
