//! Joins normalized sources into the published tables.

use std::collections::{BTreeMap, HashMap};

use polars::prelude::DataFrame;

use ico_model::{Crosswalk, LB_PER_KG, Measure, Membership, RecordKey, UnitScale};

use crate::columns::{self, measures};
use crate::error::Result;
use crate::frame::{FrameBuilder, years};
use crate::harmonize::{PopulationOverlay, PopulationTable};
use crate::rollforward::{BalanceRow, BalancedRow, StockPosition, rollforward};
use crate::table::LongTable;

/// The crop-year producer sources joined on opening stocks.
#[derive(Debug, Clone, Copy)]
pub struct ProducerSources<'a> {
    pub openstock: &'a LongTable,
    pub production: &'a LongTable,
    pub consumption: &'a LongTable,
    pub exports: &'a LongTable,
}

/// A producer balance row with its population overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerRow {
    pub balance: BalancedRow,
    pub population_beg: Option<f64>,
    pub population_mid: Option<f64>,
    pub population_end: Option<f64>,
}

fn values_by_key(table: &LongTable) -> HashMap<RecordKey, Option<f64>> {
    table.records.iter().map(|r| (r.key(), r.value)).collect()
}

/// Left-joins the flows onto opening stocks, rolls stocks forward and
/// overlays start-of-year, mid-year and end-of-crop-year population.
pub fn producer_cropyear(
    sources: ProducerSources<'_>,
    population: &PopulationTable,
    crosswalk: &Crosswalk,
) -> Vec<ProducerRow> {
    let production = values_by_key(sources.production);
    let consumption = values_by_key(sources.consumption);
    let exports = values_by_key(sources.exports);

    let rows: Vec<BalanceRow> = sources
        .openstock
        .records
        .iter()
        .map(|record| {
            let key = record.key();
            BalanceRow {
                country: record.entity.clone(),
                harvest_group: record.group.clone(),
                period: record.period.clone(),
                openstock: record.value,
                production: production.get(&key).copied().flatten(),
                consumption: consumption.get(&key).copied().flatten(),
                exports: exports.get(&key).copied().flatten(),
            }
        })
        .collect();

    rollforward(rows)
        .into_iter()
        .map(|balance| {
            let country = balance.row.country.as_str();
            let period = &balance.row.period;
            let beg = PopulationOverlay::find(population, crosswalk, country, period.start_year());
            let end = PopulationOverlay::find(population, crosswalk, country, period.end_year());
            ProducerRow {
                population_beg: beg.boy,
                population_mid: beg.mid,
                population_end: end.boy,
                balance,
            }
        })
        .collect()
}

pub fn producer_cropyear_frame(rows: &[ProducerRow]) -> Result<DataFrame> {
    let flow = |f: fn(&BalanceRow) -> Option<f64>| -> Vec<Option<f64>> {
        rows.iter().map(|r| f(&r.balance.row)).collect()
    };
    let per_scale = |f: fn(&StockPosition) -> Option<f64>| -> [Vec<Option<f64>>; 3] {
        [0, 1, 2].map(|scale| rows.iter().map(|r| f(&r.balance.positions[scale])).collect())
    };
    let balance_rows = || rows.iter().map(|r| &r.balance.row);

    FrameBuilder::new()
        .text(columns::COUNTRY, balance_rows().map(|r| Some(r.country.clone())).collect())
        .text(columns::HARVEST_GROUP, balance_rows().map(|r| r.harvest_group.clone()).collect())
        .text(columns::CROP_YEAR, balance_rows().map(|r| Some(r.period.to_string())).collect())
        .int(columns::CROP_YEAR_BEG, years(balance_rows().map(|r| Some(r.period.start_year()))))
        .int(columns::CROP_YEAR_END, years(balance_rows().map(|r| Some(r.period.end_year()))))
        .volume(&Measure::volume(measures::OPENSTOCK), &flow(|r| r.openstock))
        .volume(&Measure::volume(measures::PRODUCTION), &flow(|r| r.production))
        .volume(&Measure::volume(measures::CONSUMPTION), &flow(|r| r.consumption))
        .volume(&Measure::volume(measures::EXPORTS), &flow(|r| r.exports))
        .scaled(measures::CLOSESTOCK, per_scale(|p| p.closing_calculated))
        .scaled(measures::STOCK_ADJ, per_scale(StockPosition::adjustment))
        .float(columns::POPULATION_BEG, rows.iter().map(|r| r.population_beg).collect())
        .float(columns::POPULATION_MID, rows.iter().map(|r| r.population_mid).collect())
        .float(columns::POPULATION_END, rows.iter().map(|r| r.population_end).collect())
        .build()
}

/// Calendar-year exports with start-of-year and mid-year population.
pub fn exports_calyear_frame(
    exports: &LongTable,
    population: &PopulationTable,
    crosswalk: &Crosswalk,
) -> Result<DataFrame> {
    let records = &exports.records;
    let overlay: Vec<PopulationOverlay> = records
        .iter()
        .map(|r| PopulationOverlay::find(population, crosswalk, &r.entity, r.period.start_year()))
        .collect();

    FrameBuilder::new()
        .text(columns::COUNTRY, records.iter().map(|r| Some(r.entity.clone())).collect())
        .int(columns::CALENDAR_YEAR, years(records.iter().map(|r| Some(r.period.start_year()))))
        .volume(&exports.measure, &exports.values())
        .float(columns::POPULATION_BOY, overlay.iter().map(|p| p.boy).collect())
        .float(columns::POPULATION_MID, overlay.iter().map(|p| p.mid).collect())
        .build()
}

/// Join key of the import and re-export tables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeKey {
    pub region: Option<String>,
    pub country: String,
    pub membership: Option<Membership>,
    pub year: i32,
}

/// One row of the combined import/re-export table.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRow {
    pub key: TradeKey,
    pub imports: Option<f64>,
    pub re_exports: Option<f64>,
    pub population: PopulationOverlay,
}

/// Full outer join of an import table and a re-export table, ordered by key.
pub fn outer_join_trade(imports: &LongTable, re_exports: &LongTable) -> Vec<TradeRow> {
    let mut joined: BTreeMap<TradeKey, (Option<f64>, Option<f64>)> = BTreeMap::new();
    let key = |r: &ico_model::LongRecord| TradeKey {
        region: r.region.clone(),
        country: r.entity.clone(),
        membership: r.membership,
        year: r.period.start_year(),
    };
    for record in &imports.records {
        joined.entry(key(record)).or_default().0 = record.value;
    }
    for record in &re_exports.records {
        joined.entry(key(record)).or_default().1 = record.value;
    }
    joined
        .into_iter()
        .map(|(key, (imports, re_exports))| TradeRow {
            key,
            imports,
            re_exports,
            population: PopulationOverlay::default(),
        })
        .collect()
}

/// Member block followed by the non-member block, with population overlaid.
pub fn imports_re_exports(
    member: (&LongTable, &LongTable),
    non_member: (&LongTable, &LongTable),
    population: &PopulationTable,
    crosswalk: &Crosswalk,
) -> Vec<TradeRow> {
    let mut rows = outer_join_trade(member.0, member.1);
    rows.extend(outer_join_trade(non_member.0, non_member.1));
    for row in &mut rows {
        row.population = PopulationOverlay::find(population, crosswalk, &row.key.country, row.key.year);
    }
    rows
}

pub fn imports_re_exports_frame(rows: &[TradeRow]) -> Result<DataFrame> {
    let imports: Vec<Option<f64>> = rows.iter().map(|r| r.imports).collect();
    let re_exports: Vec<Option<f64>> = rows.iter().map(|r| r.re_exports).collect();
    FrameBuilder::new()
        .text(columns::REGION, rows.iter().map(|r| r.key.region.clone()).collect())
        .text(columns::COUNTRY, rows.iter().map(|r| Some(r.key.country.clone())).collect())
        .text(
            columns::ICO_MEMBER,
            rows.iter()
                .map(|r| r.key.membership.map(|m| m.as_str().to_string()))
                .collect(),
        )
        .int(columns::CALENDAR_YEAR, years(rows.iter().map(|r| Some(r.key.year))))
        .volume(&Measure::volume(measures::IMPORTS), &imports)
        .volume(&Measure::volume(measures::RE_EXPORTS), &re_exports)
        .float(columns::POPULATION_BOY, rows.iter().map(|r| r.population.boy).collect())
        .float(columns::POPULATION_MID, rows.iter().map(|r| r.population.mid).collect())
        .build()
}

/// Fixed reference table of the unit scales and their conversion factors.
pub fn unit_conversions_frame() -> Result<DataFrame> {
    let scales = UnitScale::ALL;
    FrameBuilder::new()
        .text("unit", scales.iter().map(|s| Some(s.label().to_string())).collect())
        .text("suffix", scales.iter().map(|s| Some(s.suffix().to_string())).collect())
        .float("kg_per_unit", scales.iter().map(|s| Some(s.kg_per_unit())).collect())
        .float(
            "lb_per_unit",
            scales.iter().map(|s| Some(s.kg_per_unit() * LB_PER_KG)).collect(),
        )
        .build()
}
