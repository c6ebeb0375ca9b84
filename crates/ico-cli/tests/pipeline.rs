//! End-to-end runs over CSV exports in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use ico_cli::pipeline::{RunConfig, ingest, run_pipeline};
use ico_cli::types::Stage;
use ico_model::PipelineOptions;
use tempfile::TempDir;

struct Workspace {
    _root: TempDir,
    input: PathBuf,
    external: PathBuf,
    interim: PathBuf,
    output: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("raw");
        let external = root.path().join("external");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&external).unwrap();
        Self {
            input,
            external,
            interim: root.path().join("interim"),
            output: root.path().join("processed"),
            _root: root,
        }
    }

    fn config(&self, options: PipelineOptions) -> RunConfig {
        RunConfig {
            input_dir: self.input.clone(),
            external_dir: self.external.clone(),
            interim_dir: self.interim.clone(),
            output_dir: self.output.clone(),
            options,
            dry_run: false,
        }
    }
}

fn csv_line(cells: &[&str]) -> String {
    let quoted: Vec<String> = cells
        .iter()
        .map(|cell| {
            if cell.contains(',') {
                format!("\"{cell}\"")
            } else {
                (*cell).to_string()
            }
        })
        .collect();
    quoted.join(",")
}

/// Title line, two empty lines, header on row 3.
fn sheet(header: &[&str], rows: &[&[&str]]) -> Vec<String> {
    let mut lines = vec![csv_line(&["Coffee statistics"]), String::new(), String::new()];
    lines.push(csv_line(header));
    lines.extend(rows.iter().map(|row| csv_line(row)));
    lines
}

fn write_sheet(dir: &Path, file: &str, lines: &[String]) {
    fs::write(dir.join(file), lines.join("\n") + "\n").unwrap();
}

fn producer(values: [[&str; 2]; 3]) -> Vec<String> {
    sheet(
        &["Crop year", "1990/91", "1991/92"],
        &[
            &["April group"],
            &["Angola", values[0][0], values[0][1]],
            &["Burundi", values[1][0], values[1][1]],
            &["July group"],
            &["Tanzania", values[2][0], values[2][1]],
            &["Total", "0", "0"],
        ],
    )
}

fn member(merged: &str, belgium: &str, luxembourg: &str) -> Vec<String> {
    sheet(
        &["Calendar years", "1998", "1999"],
        &[
            &["Austria", "1", "2"],
            &["Belgium", "", belgium],
            &["Belgium/Luxembourg", merged, ""],
            &["Luxembourg", "", luxembourg],
            &["European Union", "500", "600"],
            &["Total", "0", "0"],
        ],
    )
}

fn non_member() -> Vec<String> {
    let mut lines = sheet(
        &["Calendar years", "1998", "1999"],
        &[
            &["Africa"],
            &["Algeria", "10", "11"],
            &["Asia & Oceania"],
            &["China, People's Republic of", "99", "99"],
            &["Hong Kong", "4", "5"],
        ],
    );
    while lines.len() < 129 {
        lines.push(String::new());
    }
    lines.push(csv_line(&["Total", "113", "115"]));
    lines
}

fn seed(ws: &Workspace) {
    let dir = &ws.input;
    write_sheet(
        dir,
        "1a - Total production.csv",
        &producer([["10", "10"], ["5", "6"], ["20", "21"]]),
    );
    write_sheet(
        dir,
        "1b - Domestic consumption.csv",
        &producer([["5", "5"], ["1", "1"], ["3", "3"]]),
    );
    write_sheet(
        dir,
        "1c - Gross opening stocks.csv",
        &producer([["100", "105"], ["0", "0"], ["50", ""]]),
    );
    write_sheet(
        dir,
        "2a - Exports crop year.csv",
        &producer([["2", "2"], ["10", "4"], ["n/a", "15"]]),
    );
    write_sheet(
        dir,
        "2b - Exports calendar year.csv",
        &sheet(
            &["Calendar years", "1990", "1991"],
            &[
                &["April group"],
                &["Angola", "3", "4"],
                &["Total", "3", "4"],
            ],
        ),
    );
    write_sheet(dir, "3a - Imports.csv", &member("100", "80", "20"));
    write_sheet(dir, "3b - Re-exports.csv", &member("10", "3", "1"));
    write_sheet(dir, "4a - Non-member imports.csv", &non_member());
    write_sheet(dir, "4b - Non-member re-exports.csv", &non_member());
    fs::write(dir.join("notes.csv"), "not,a,source\n").unwrap();

    fs::write(
        ws.external.join(PipelineOptions::default().population_file),
        "Location,Time,TPopulation1Jan,TPopulation1July\n\
         Angola,1990,10,10.5\n\
         Angola,1991,11,11.5\n\
         United Republic of Tanzania,1990,25,25.5\n\
         \"China, Hong Kong SAR\",1998,6.5,7\n\
         Belgium,1998,10.2,10.7\n",
    )
    .unwrap();
}

fn header(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[test]
fn run_writes_interim_outputs_and_manifest() {
    let ws = Workspace::new();
    seed(&ws);

    let result = run_pipeline(&ws.config(PipelineOptions::default())).unwrap();

    for name in [
        "producer_cropyear",
        "imports_re_exports",
        "exports_calyear",
        "unit_conversions",
    ] {
        assert!(ws.output.join(format!("{name}.csv")).is_file(), "{name}");
    }
    assert!(!ws.output.join("grower_vs_indicator_prices.csv").exists());
    assert!(ws.interim.join("total_production.csv").is_file());
    assert!(ws.interim.join("population_data.csv").is_file());
    assert_eq!(result.skipped, vec!["grower_vs_indicator_prices".to_string()]);

    let producer = ws.output.join("producer_cropyear.csv");
    assert!(header(&producer).starts_with("country,harvest_group,crop_year,crop_year_beg"));
    let first_row = fs::read_to_string(&producer).unwrap();
    assert!(first_row.lines().nth(1).unwrap().starts_with("Angola,April,"));
    assert_eq!(
        header(&ws.output.join("imports_re_exports.csv")),
        "region,country,ico_member,calendar_year,imports_1k_bags,imports_kg,imports_lb,\
         re_exports_1k_bags,re_exports_kg,re_exports_lb,population_boy,population_mid"
    );

    let manifest_path = result.manifest.clone().unwrap();
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["tool"], "ico-harmonize");
    assert_eq!(manifest["outputs"].as_array().unwrap().len(), 4);
    assert_eq!(manifest["skipped"][0], "grower_vs_indicator_prices");
    let producer_entry = manifest["outputs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["name"] == "producer_cropyear")
        .unwrap();
    assert_eq!(producer_entry["rows"], 6);
    assert_eq!(producer_entry["sha256"].as_str().unwrap().len(), 64);

    assert_eq!(result.total_rows(Stage::Output), {
        result
            .tables
            .iter()
            .filter(|t| t.stage == Stage::Output)
            .map(|t| t.rows)
            .sum::<usize>()
    });
    assert!(result.tables.iter().all(|t| t.path.is_some()));
}

#[test]
fn dry_run_writes_nothing() {
    let ws = Workspace::new();
    seed(&ws);
    let mut config = ws.config(PipelineOptions::default());
    config.dry_run = true;

    let result = run_pipeline(&config).unwrap();

    assert!(!ws.output.exists());
    assert!(!ws.interim.exists());
    assert!(result.manifest.is_none());
    assert!(result.tables.iter().all(|t| t.path.is_none()));
    assert!(result.total_rows(Stage::Output) > 0);
}

#[test]
fn interim_tables_can_be_disabled() {
    let ws = Workspace::new();
    seed(&ws);
    let options = PipelineOptions::default().with_interim(false);

    let result = run_pipeline(&ws.config(options)).unwrap();

    assert!(!ws.interim.exists());
    assert!(ws.output.join("producer_cropyear.csv").is_file());
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(result.manifest.unwrap()).unwrap()).unwrap();
    assert!(manifest["interim"].as_array().unwrap().is_empty());
}

#[test]
fn ingest_ignores_unknown_and_duplicate_files() {
    let ws = Workspace::new();
    seed(&ws);
    // A second export of the same source.
    fs::copy(
        ws.input.join("3a - Imports.csv"),
        ws.input.join("3z - Imports.csv"),
    )
    .unwrap();

    let ingested = ingest(&ws.input, &ws.external, &PipelineOptions::default()).unwrap();

    assert_eq!(ingested.used.len(), 9);
    assert!(ingested.sources.missing().is_empty());
    let ignored: Vec<String> = ingested.ignored.iter().map(|f| f.key.clone()).collect();
    assert_eq!(ignored, vec!["imports".to_string(), "notes".to_string()]);
    assert_eq!(ingested.sources.population.len(), 5);
}

#[test]
fn missing_population_file_names_the_path() {
    let ws = Workspace::new();
    seed(&ws);
    let options = PipelineOptions::default().with_population_file("absent.csv");

    let err = run_pipeline(&ws.config(options)).unwrap_err();

    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn missing_required_source_fails_the_run() {
    let ws = Workspace::new();
    seed(&ws);
    fs::remove_file(ws.input.join("3b - Re-exports.csv")).unwrap();

    let err = run_pipeline(&ws.config(PipelineOptions::default())).unwrap_err();

    assert!(format!("{err:#}").contains("re_exports"));
    assert!(!ws.output.exists());
}
