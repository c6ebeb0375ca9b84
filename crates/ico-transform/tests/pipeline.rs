//! End-to-end harmonization over literal fixture sheets.

use ico_model::{PipelineOptions, PopulationRecord, RawCell, RawTable, SourceKind};
use ico_transform::pipeline::{
    EXPORTS_CALYEAR, GROWER_VS_INDICATOR, IMPORTS_RE_EXPORTS, POPULATION_TABLE, PRODUCER_CROPYEAR,
    UNIT_CONVERSIONS,
};
use ico_transform::{HarmonizedTables, NamedFrame, SourceTables, TransformError, harmonize};
use polars::prelude::DataFrame;

fn cells(values: &[&str]) -> Vec<RawCell> {
    values.iter().map(|v| RawCell::from(*v)).collect()
}

/// Three title rows, the header on row 3, data from row 4.
fn sheet(name: &str, header: &[&str], rows: &[&[&str]]) -> RawTable {
    let mut all = vec![cells(&[name]), cells(&[]), cells(&[])];
    all.push(cells(header));
    all.extend(rows.iter().map(|row| cells(row)));
    RawTable::new(name, all)
}

fn producer_sheet(name: &str, values: [[&str; 2]; 3]) -> RawTable {
    sheet(
        name,
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

fn non_member_sheet(name: &str) -> RawTable {
    let mut table = sheet(
        name,
        &["Calendar years", "1998", "1999"],
        &[
            &["Africa"],
            &["Algeria", "10", "11"],
            &["Asia & Oceania"],
            &["China, People's Republic of", "99", "99"],
            &["Hong Kong", "4", "5"],
        ],
    );
    while table.rows.len() < 129 {
        table.rows.push(Vec::new());
    }
    table.rows.push(cells(&["Total", "113", "115"]));
    table
}

fn population(country: &str, year: i32, boy: f64) -> PopulationRecord {
    PopulationRecord {
        country: country.to_string(),
        year,
        population_boy: Some(boy),
        population_mid: Some(boy + 0.5),
    }
}

fn volume_sources() -> SourceTables {
    let mut sources = SourceTables::new(vec![
        population("Angola", 1990, 10.0),
        population("Angola", 1991, 11.0),
        population("United Republic of Tanzania", 1990, 25.0),
        population("China, Hong Kong SAR", 1998, 6.5),
        population("Belgium", 1998, 10.2),
    ]);
    sources.insert(
        SourceKind::GrossOpeningStocks,
        producer_sheet("gross_opening_stocks", [["100", "105"], ["0", "0"], ["50", ""]]),
    );
    sources.insert(
        SourceKind::TotalProduction,
        producer_sheet("total_production", [["10", "10"], ["5", "6"], ["20", "21"]]),
    );
    sources.insert(
        SourceKind::DomesticConsumption,
        producer_sheet("domestic_consumption", [["5", "5"], ["1", "1"], ["3", "3"]]),
    );
    sources.insert(
        SourceKind::ExportsCropYear,
        producer_sheet("exports_crop_year", [["2", "2"], ["10", "4"], ["n/a", "15"]]),
    );
    sources.insert(
        SourceKind::ExportsCalendarYear,
        sheet(
            "exports_calendar_year",
            &["Calendar years", "1990", "1991"],
            &[
                &["April group"],
                &["Angola", "3", "4"],
                &["Total", "3", "4"],
            ],
        ),
    );
    let member = |name: &str, merged: &str, belgium: &str, luxembourg: &str| {
        sheet(
            name,
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
    };
    sources.insert(SourceKind::Imports, member("imports", "100", "80", "20"));
    sources.insert(SourceKind::ReExports, member("re_exports", "10", "3", "1"));
    sources.insert(SourceKind::NonMemberImports, non_member_sheet("non_member_imports"));
    sources.insert(
        SourceKind::NonMemberReExports,
        non_member_sheet("non_member_re_exports"),
    );
    sources
}

fn with_prices(mut sources: SourceTables) -> SourceTables {
    sources.insert(
        SourceKind::GrowerPrices,
        sheet(
            "prices_paid_to_growers",
            &["Calendar years", "1990", "1991"],
            &[
                &["Robustas"],
                &["Uganda", "5", "6"],
                &["Other Milds"],
                &["Kenya", "50", "60"],
            ],
        ),
    );
    sources.insert(
        SourceKind::IndicatorPrices,
        sheet(
            "indicator_prices",
            &["Period", "Robustas", "Other Milds"],
            &[
                &["1990", "20", "100"],
                &["January", "10", "90"],
                &["February", "20", "100"],
                &["March", "30", "110"],
            ],
        ),
    );
    sources
}

fn frame<'a>(frames: &'a [NamedFrame], name: &str) -> &'a DataFrame {
    &frames
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("missing table {name}"))
        .frame
}

fn column_names(df: &DataFrame) -> String {
    df.get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(sources: &SourceTables) -> HarmonizedTables {
    harmonize(sources, &PipelineOptions::default()).unwrap()
}

#[test]
fn producer_cropyear_column_contract() {
    let result = run(&volume_sources());
    insta::assert_snapshot!(column_names(frame(&result.outputs, PRODUCER_CROPYEAR)), @r"
    country
    harvest_group
    crop_year
    crop_year_beg
    crop_year_end
    openstock_1k_bags
    openstock_kg
    openstock_lb
    production_1k_bags
    production_kg
    production_lb
    consumption_1k_bags
    consumption_kg
    consumption_lb
    exports_1k_bags
    exports_kg
    exports_lb
    closestock_1k_bags
    closestock_kg
    closestock_lb
    stock_adj_1k_bags
    stock_adj_kg
    stock_adj_lb
    population_beg
    population_mid
    population_end
    ");
}

#[test]
fn imports_re_exports_column_contract() {
    let result = run(&volume_sources());
    insta::assert_snapshot!(column_names(frame(&result.outputs, IMPORTS_RE_EXPORTS)), @r"
    region
    country
    ico_member
    calendar_year
    imports_1k_bags
    imports_kg
    imports_lb
    re_exports_1k_bags
    re_exports_kg
    re_exports_lb
    population_boy
    population_mid
    ");
}

#[test]
fn producer_balance_rolls_forward_per_country() {
    let result = run(&volume_sources());
    let df = frame(&result.outputs, PRODUCER_CROPYEAR);
    assert_eq!(df.height(), 6);

    let country = df.column("country").unwrap().str().unwrap();
    let close = df.column("closestock_1k_bags").unwrap().f64().unwrap();
    let adj = df.column("stock_adj_1k_bags").unwrap().f64().unwrap();
    let pop_end = df.column("population_end").unwrap().f64().unwrap();

    // Sorted by country: Angola, Angola, Burundi, Burundi, Tanzania, Tanzania.
    assert_eq!(country.get(0), Some("Angola"));
    assert_eq!(close.get(0), Some(103.0));
    assert_eq!(adj.get(0), Some(2.0));
    assert_eq!(pop_end.get(0), Some(11.0));
    assert_eq!(adj.get(1), None);

    // Burundi exports more than it holds: the balance floors at zero.
    assert_eq!(country.get(2), Some("Burundi"));
    assert_eq!(close.get(2), Some(0.0));

    // Tanzania is spelled differently by the population source.
    let pop_beg = df.column("population_beg").unwrap().f64().unwrap();
    assert_eq!(country.get(4), Some("Tanzania"));
    assert_eq!(pop_beg.get(4), Some(25.0));
    assert_eq!(close.get(4), None);
}

#[test]
fn merged_importer_is_split_and_regions_assigned() {
    let result = run(&volume_sources());
    let df = frame(&result.outputs, IMPORTS_RE_EXPORTS);
    let country = df.column("country").unwrap().str().unwrap();
    let region = df.column("region").unwrap().str().unwrap();
    let year = df.column("calendar_year").unwrap().i64().unwrap();
    let imports = df.column("imports_1k_bags").unwrap().f64().unwrap();
    let population = df.column("population_boy").unwrap().f64().unwrap();

    let rows: Vec<usize> = (0..df.height()).collect();
    assert!(rows.iter().all(|&i| country.get(i) != Some("Belgium/Luxembourg")));
    assert!(rows.iter().all(|&i| country.get(i) != Some("European Union")));
    assert!(rows.iter().all(|&i| country.get(i) != Some("China, People's Republic of")));

    let belgium_1998 = rows
        .iter()
        .copied()
        .find(|&i| country.get(i) == Some("Belgium") && year.get(i) == Some(1998))
        .unwrap();
    assert!((imports.get(belgium_1998).unwrap() - 80.0).abs() < 1e-9);
    assert_eq!(region.get(belgium_1998), Some("Europe"));
    assert_eq!(population.get(belgium_1998), Some(10.2));

    let hong_kong = rows
        .iter()
        .copied()
        .find(|&i| country.get(i) == Some("Hong Kong") && year.get(i) == Some(1998))
        .unwrap();
    assert_eq!(region.get(hong_kong), Some("Asia & Oceania"));
    assert_eq!(population.get(hong_kong), Some(6.5));

    let members = df.column("ico_member").unwrap().str().unwrap();
    assert_eq!(members.get(0), Some("member"));
    assert_eq!(members.get(df.height() - 1), Some("non-member"));
}

#[test]
fn interim_tables_cover_every_supplied_source() {
    let result = run(&volume_sources());
    let names: Vec<&str> = result.interim.iter().map(|f| f.name.as_str()).collect();
    for kind in SourceKind::required() {
        assert!(names.contains(&kind.key()), "{kind}");
    }
    assert_eq!(names.last(), Some(&POPULATION_TABLE));
    let imports = frame(&result.interim, "imports");
    assert_eq!(imports.width(), 7);
}

#[test]
fn price_comparison_is_skipped_without_price_sources() {
    let result = run(&volume_sources());
    let names: Vec<&str> = result.outputs.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![PRODUCER_CROPYEAR, IMPORTS_RE_EXPORTS, EXPORTS_CALYEAR, UNIT_CONVERSIONS]
    );
    assert_eq!(result.skipped, vec![GROWER_VS_INDICATOR.to_string()]);
}

#[test]
fn grower_prices_are_compared_to_the_annual_indicator() {
    let result = run(&with_prices(volume_sources()));
    assert!(result.skipped.is_empty());
    let df = frame(&result.outputs, GROWER_VS_INDICATOR);
    insta::assert_snapshot!(column_names(df), @r"
    country
    coffee_type
    calendar_year
    grower_price_us_cents_lb
    indicator_price_us_cents_lb
    grower_share_of_indicator
    ");

    let country = df.column("country").unwrap().str().unwrap();
    let year = df.column("calendar_year").unwrap().i64().unwrap();
    let share = df.column("grower_share_of_indicator").unwrap().f64().unwrap();
    for i in 0..df.height() {
        match (country.get(i), year.get(i)) {
            (Some("Uganda"), Some(1990)) => assert_eq!(share.get(i), Some(0.25)),
            (Some("Kenya"), Some(1990)) => assert_eq!(share.get(i), Some(0.5)),
            (_, Some(1991)) => assert_eq!(share.get(i), None),
            other => panic!("unexpected row {other:?}"),
        }
    }

    let indicator = frame(&result.interim, "indicator_prices");
    assert_eq!(indicator.height(), 6);
}

#[test]
fn missing_required_source_is_fatal() {
    let mut sources = SourceTables::new(Vec::new());
    sources.insert(
        SourceKind::TotalProduction,
        producer_sheet("total_production", [["1", "1"], ["1", "1"], ["1", "1"]]),
    );
    let err = harmonize(&sources, &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::MissingSource(_)));
}

#[test]
fn shifted_non_member_total_is_a_schema_mismatch() {
    let mut sources = volume_sources();
    let mut moved = non_member_sheet("non_member_imports");
    moved.rows.swap(10, 129);
    sources.insert(SourceKind::NonMemberImports, moved);
    let err = harmonize(&sources, &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::SchemaMismatch { .. }));
}
