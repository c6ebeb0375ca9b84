//! The fixed harmonization topology over explicit input and output contexts.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use ico_model::{PipelineOptions, PopulationRecord, RawTable, SourceKind};

use crate::assemble::{self, ProducerSources};
use crate::catalog;
use crate::error::{Result, TransformError};
use crate::harmonize::PopulationTable;
use crate::indicator::{self, IndicatorTable};
use crate::normalize::normalize;
use crate::table::LongTable;

/// Name of the interim population table.
pub const POPULATION_TABLE: &str = "population_data";

/// Output table names, in write order.
pub const PRODUCER_CROPYEAR: &str = "producer_cropyear";
pub const IMPORTS_RE_EXPORTS: &str = "imports_re_exports";
pub const EXPORTS_CALYEAR: &str = "exports_calyear";
pub const GROWER_VS_INDICATOR: &str = "grower_vs_indicator_prices";
pub const UNIT_CONVERSIONS: &str = "unit_conversions";

/// Raw inputs of one run.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    tables: BTreeMap<SourceKind, RawTable>,
    pub population: Vec<PopulationRecord>,
}

impl SourceTables {
    pub fn new(population: Vec<PopulationRecord>) -> Self {
        Self {
            tables: BTreeMap::new(),
            population,
        }
    }

    /// Adds a source sheet, returning the one it replaces.
    pub fn insert(&mut self, kind: SourceKind, table: RawTable) -> Option<RawTable> {
        self.tables.insert(kind, table)
    }

    pub fn get(&self, kind: SourceKind) -> Option<&RawTable> {
        self.tables.get(&kind)
    }

    pub fn require(&self, kind: SourceKind) -> Result<&RawTable> {
        self.get(kind).ok_or(TransformError::MissingSource(kind))
    }

    pub fn kinds(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.tables.keys().copied()
    }

    /// Required sources with no table supplied.
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::required()
            .filter(|kind| !self.tables.contains_key(kind))
            .collect()
    }
}

/// A table ready to be written under `name`.
#[derive(Debug, Clone)]
pub struct NamedFrame {
    pub name: String,
    pub frame: DataFrame,
}

impl NamedFrame {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct HarmonizedTables {
    /// Per-source normalized tables and the population table.
    pub interim: Vec<NamedFrame>,
    /// Published tables.
    pub outputs: Vec<NamedFrame>,
    /// Stages that were skipped for lack of optional inputs.
    pub skipped: Vec<String>,
}

/// Runs every stage over `sources`.
///
/// # Errors
///
/// Fails on a missing required source, a schema mismatch in any sheet, or an
/// unavailable split ratio.
pub fn harmonize(sources: &SourceTables, options: &PipelineOptions) -> Result<HarmonizedTables> {
    if let Some(kind) = sources.missing().into_iter().next() {
        return Err(TransformError::MissingSource(kind));
    }

    let normalized = info_span!("normalize").in_scope(|| normalize_sources(sources, options))?;
    let indicator = sources
        .get(SourceKind::IndicatorPrices)
        .map(|raw| {
            info_span!("normalize", source = %SourceKind::IndicatorPrices)
                .in_scope(|| indicator::pivot_indicator(raw, &catalog::indicator_window()))
        })
        .transpose()?;

    let population = PopulationTable::new(
        sources.population.clone(),
        &catalog::population_aggregates(),
    );
    debug!(rows = population.len(), "population table ready");

    let mut result = HarmonizedTables::default();
    for (kind, table) in &normalized {
        result
            .interim
            .push(NamedFrame::new(kind.key(), table.to_frame()?));
    }
    if let Some(indicator) = &indicator {
        result.interim.push(NamedFrame::new(
            SourceKind::IndicatorPrices.key(),
            indicator.to_frame()?,
        ));
    }
    result
        .interim
        .push(NamedFrame::new(POPULATION_TABLE, population.to_frame()?));

    info_span!("assemble").in_scope(|| {
        assemble_outputs(&normalized, indicator.as_ref(), &population, &mut result)
    })?;
    Ok(result)
}

fn normalize_sources(
    sources: &SourceTables,
    options: &PipelineOptions,
) -> Result<BTreeMap<SourceKind, LongTable>> {
    let split = catalog::belgium_luxembourg(options.split_cutover_year);
    let mut normalized = BTreeMap::new();
    for kind in SourceKind::ALL {
        let Some(layout) = catalog::source_layout(kind) else {
            continue;
        };
        let Some(raw) = sources.get(kind) else {
            debug!(source = %kind, "optional source not supplied");
            continue;
        };
        let span = info_span!("source", source = %kind);
        let _guard = span.enter();
        let start = Instant::now();

        let mut table = normalize(raw, &layout)?;
        if matches!(kind, SourceKind::Imports | SourceKind::ReExports) {
            assign_member_regions(&mut table);
            table = split.resolve(table)?;
        }
        info!(
            rows = table.len(),
            duration_ms = start.elapsed().as_millis(),
            "source normalized"
        );
        normalized.insert(kind, table);
    }
    Ok(normalized)
}

fn assign_member_regions(table: &mut LongTable) {
    let mut unmapped = 0usize;
    for record in &mut table.records {
        record.region = catalog::member_region(&record.entity).map(str::to_string);
        if record.region.is_none() {
            unmapped += 1;
        }
    }
    if unmapped > 0 {
        debug!(table = %table.name, rows = unmapped, "member rows without a region");
    }
}

fn assemble_outputs(
    normalized: &BTreeMap<SourceKind, LongTable>,
    indicator: Option<&IndicatorTable>,
    population: &PopulationTable,
    result: &mut HarmonizedTables,
) -> Result<()> {
    let table = |kind: SourceKind| normalized.get(&kind).ok_or(TransformError::MissingSource(kind));
    let producer_names = catalog::producer_crosswalk()?;
    let trade_names = catalog::trade_crosswalk()?;

    let start = Instant::now();
    let producer = assemble::producer_cropyear(
        ProducerSources {
            openstock: table(SourceKind::GrossOpeningStocks)?,
            production: table(SourceKind::TotalProduction)?,
            consumption: table(SourceKind::DomesticConsumption)?,
            exports: table(SourceKind::ExportsCropYear)?,
        },
        population,
        &producer_names,
    );
    push_output(
        result,
        PRODUCER_CROPYEAR,
        assemble::producer_cropyear_frame(&producer)?,
        start,
    );

    let start = Instant::now();
    let trade = assemble::imports_re_exports(
        (table(SourceKind::Imports)?, table(SourceKind::ReExports)?),
        (
            table(SourceKind::NonMemberImports)?,
            table(SourceKind::NonMemberReExports)?,
        ),
        population,
        &trade_names,
    );
    push_output(
        result,
        IMPORTS_RE_EXPORTS,
        assemble::imports_re_exports_frame(&trade)?,
        start,
    );

    let start = Instant::now();
    let exports = assemble::exports_calyear_frame(
        table(SourceKind::ExportsCalendarYear)?,
        population,
        &producer_names,
    )?;
    push_output(result, EXPORTS_CALYEAR, exports, start);

    match (normalized.get(&SourceKind::GrowerPrices), indicator) {
        (Some(growers), Some(indicator)) => {
            let start = Instant::now();
            let rows = indicator::compare_grower_prices(growers, indicator);
            push_output(
                result,
                GROWER_VS_INDICATOR,
                indicator::comparison_frame(&rows)?,
                start,
            );
        }
        (growers, indicator) => {
            warn!(
                grower_prices = growers.is_some(),
                indicator_prices = indicator.is_some(),
                "skipping grower price comparison, both price sources are needed"
            );
            result.skipped.push(GROWER_VS_INDICATOR.to_string());
        }
    }

    push_output(
        result,
        UNIT_CONVERSIONS,
        assemble::unit_conversions_frame()?,
        Instant::now(),
    );
    Ok(())
}

fn push_output(result: &mut HarmonizedTables, name: &str, frame: DataFrame, start: Instant) {
    info!(
        table = name,
        rows = frame.height(),
        duration_ms = start.elapsed().as_millis(),
        "table assembled"
    );
    result.outputs.push(NamedFrame::new(name, frame));
}
