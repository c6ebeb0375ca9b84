//! Configuration options for a harmonization run.

use serde::{Deserialize, Serialize};

/// Default name of the external population file.
pub const DEFAULT_POPULATION_FILE: &str = "WPP2022_Demographic_Indicators_Medium.csv";

/// First calendar year in which Belgium and Luxembourg report separately.
pub const DEFAULT_SPLIT_CUTOVER_YEAR: i32 = 1999;

/// Options controlling a pipeline run.
///
/// Every field has a default, so a configuration file only needs to name the
/// fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// File name of the population table inside the external directory.
    pub population_file: String,

    /// First year from which the split successors report independently.
    pub split_cutover_year: i32,

    /// Write per-source normalized tables to the interim directory.
    pub write_interim: bool,

    /// Write `run_manifest.json` next to the outputs.
    pub write_manifest: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            population_file: DEFAULT_POPULATION_FILE.to_string(),
            split_cutover_year: DEFAULT_SPLIT_CUTOVER_YEAR,
            write_interim: true,
            write_manifest: true,
        }
    }
}

impl PipelineOptions {
    pub fn with_population_file(mut self, name: impl Into<String>) -> Self {
        self.population_file = name.into();
        self
    }

    pub fn with_interim(mut self, enable: bool) -> Self {
        self.write_interim = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let options: PipelineOptions =
            serde_json::from_str(r#"{"split_cutover_year": 2000}"#).unwrap();
        assert_eq!(options.split_cutover_year, 2000);
        assert_eq!(options.population_file, DEFAULT_POPULATION_FILE);
        assert!(options.write_interim);
    }
}
