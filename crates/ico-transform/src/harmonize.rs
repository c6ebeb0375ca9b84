//! Population overlay across independently named datasets.
//!
//! Trade sources and the demographic source spell some countries
//! differently and some trade entities no longer exist. Trade names are
//! mapped through a [`Crosswalk`] before joining, and dissolved entities get
//! a synthesized population series summed from their successors.

use std::collections::{BTreeMap, HashMap};
use std::collections::hash_map::Entry;

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use ico_model::{AggregateEntity, Crosswalk, PopulationRecord};

use crate::columns;
use crate::error::Result;
use crate::frame::{FrameBuilder, years};

/// Sums the constituent series of every aggregate, per year.
///
/// Only constituents present in a given year contribute and null values are
/// skipped; a year in which every contribution is null stays null.
pub fn synthesize_aggregates(
    records: &[PopulationRecord],
    aggregates: &[AggregateEntity],
) -> Vec<PopulationRecord> {
    let mut synthesized = Vec::new();
    for aggregate in aggregates {
        let mut by_year: BTreeMap<i32, (Option<f64>, Option<f64>)> = BTreeMap::new();
        for record in records
            .iter()
            .filter(|r| aggregate.constituents.iter().any(|c| c == &r.country))
        {
            let (boy, mid) = by_year.entry(record.year).or_default();
            *boy = add_present(*boy, record.population_boy);
            *mid = add_present(*mid, record.population_mid);
        }
        debug!(aggregate = %aggregate.name, years = by_year.len(), "synthesized population");
        synthesized.extend(by_year.into_iter().map(|(year, (boy, mid))| PopulationRecord {
            country: aggregate.name.clone(),
            year,
            population_boy: boy,
            population_mid: mid,
        }));
    }
    synthesized
}

fn add_present(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(t), Some(v)) => Some(t + v),
        (None, v) => v,
        (t, None) => t,
    }
}

/// Population records with aggregates appended, indexed by `(country, year)`.
#[derive(Debug, Clone, Default)]
pub struct PopulationTable {
    pub records: Vec<PopulationRecord>,
    /// Country, then year, to record position.
    index: HashMap<String, HashMap<i32, usize>>,
}

impl PopulationTable {
    /// Appends synthesized aggregates and indexes the result.
    ///
    /// When a key occurs twice the first record wins.
    pub fn new(mut records: Vec<PopulationRecord>, aggregates: &[AggregateEntity]) -> Self {
        let synthesized = synthesize_aggregates(&records, aggregates);
        records.extend(synthesized);

        let mut index: HashMap<String, HashMap<i32, usize>> = HashMap::new();
        let mut duplicates = 0usize;
        for (i, record) in records.iter().enumerate() {
            let years = index.entry(record.country.clone()).or_default();
            match years.entry(record.year) {
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
        if duplicates > 0 {
            warn!(duplicates, "duplicate population keys, keeping the first record");
        }
        Self { records, index }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, country: &str, year: i32) -> Option<&PopulationRecord> {
        let &i = self.index.get(country)?.get(&year)?;
        self.records.get(i)
    }

    /// Looks up a trade entity after mapping its name through `crosswalk`.
    pub fn lookup(&self, crosswalk: &Crosswalk, name: &str, year: i32) -> Option<&PopulationRecord> {
        self.get(crosswalk.map(name), year)
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        FrameBuilder::new()
            .text(
                columns::COUNTRY,
                self.records.iter().map(|r| Some(r.country.clone())).collect(),
            )
            .int(columns::YEAR, years(self.records.iter().map(|r| Some(r.year))))
            .float(
                columns::POPULATION_BOY,
                self.records.iter().map(|r| r.population_boy).collect(),
            )
            .float(
                columns::POPULATION_MID,
                self.records.iter().map(|r| r.population_mid).collect(),
            )
            .build()
    }
}

/// Population columns joined onto one trade row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopulationOverlay {
    pub boy: Option<f64>,
    pub mid: Option<f64>,
}

impl PopulationOverlay {
    /// Left-join lookup: a miss yields nulls, never an error.
    pub fn find(
        population: &PopulationTable,
        crosswalk: &Crosswalk,
        country: &str,
        year: i32,
    ) -> Self {
        population
            .lookup(crosswalk, country, year)
            .map_or_else(Self::default, |r| Self {
                boy: r.population_boy,
                mid: r.population_mid,
            })
    }
}
