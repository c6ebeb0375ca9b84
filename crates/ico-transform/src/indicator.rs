//! Indicator price pivot and the grower price comparison built on it.
//!
//! The indicator sheet lists periods down its first column: a four-digit
//! year row carrying the annual average, followed by that year's month rows.
//! Categories run across the columns.

use std::collections::HashMap;

use chrono::Month;
use polars::prelude::DataFrame;
use tracing::{debug, warn};

use ico_model::RawTable;

use crate::block::WideBlock;
use crate::columns;
use crate::error::Result;
use crate::frame::{FrameBuilder, years};
use crate::table::LongTable;
use crate::tagging::{TagMatcher, TagRule, TagSlot, TagTransform};
use crate::window::DataWindow;

/// One monthly indicator price with its year's annual average attached.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    pub category: String,
    pub year: i32,
    pub month: String,
    pub month_num: Option<u32>,
    pub price: Option<f64>,
    pub annual_price: Option<f64>,
}

/// Monthly indicator prices plus the annual averages they were joined to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    pub records: Vec<IndicatorRecord>,
    annual: HashMap<(String, i32), f64>,
}

impl IndicatorTable {
    /// Annual average for a category and year, if reported.
    pub fn annual(&self, category: &str, year: i32) -> Option<f64> {
        self.annual.get(&(category.to_string(), year)).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        let records = &self.records;
        FrameBuilder::new()
            .text(columns::CATEGORY, records.iter().map(|r| Some(r.category.clone())).collect())
            .int(columns::YEAR, years(records.iter().map(|r| Some(r.year))))
            .text(columns::MONTH, records.iter().map(|r| Some(r.month.clone())).collect())
            .int(
                columns::MONTH_NUM,
                records.iter().map(|r| r.month_num.map(i64::from)).collect(),
            )
            .float(columns::INDICATOR_PRICE, records.iter().map(|r| r.price).collect())
            .float(
                columns::ANNUAL_INDICATOR_PRICE,
                records.iter().map(|r| r.annual_price).collect(),
            )
            .build()
    }
}

/// Parses an English month name or three-letter abbreviation.
pub fn month_number(label: &str) -> Option<u32> {
    label.trim().parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Separates annual and monthly rows and attaches the annual average to
/// every month of the same year and category.
pub fn pivot_indicator(raw: &RawTable, window: &DataWindow) -> Result<IndicatorTable> {
    let block = WideBlock::extract(raw, window)?;
    let labels = block.entity_labels(raw);
    let slots = TagRule::new(TagMatcher::Year, TagTransform::Identity)
        .apply(labels.iter().map(Option::as_deref));

    let mut annual = HashMap::new();
    let mut months = Vec::new();
    let mut orphaned = 0usize;
    for ((&row, label), slot) in block.rows.iter().zip(&labels).zip(&slots) {
        match slot {
            TagSlot::Header(year) => {
                let Ok(year) = year.parse::<i32>() else {
                    continue;
                };
                for (col, category) in &block.value_columns {
                    if let Some(value) = raw.cell(row, *col).number() {
                        annual.insert((category.clone(), year), value);
                    }
                }
            }
            TagSlot::Item(Some(year)) => match (year.parse::<i32>(), label) {
                (Ok(year), Some(label)) => months.push((row, year, label.clone())),
                _ => orphaned += 1,
            },
            TagSlot::Item(None) => orphaned += 1,
        }
    }
    if orphaned > 0 {
        warn!(table = %raw.name, rows = orphaned, "skipping indicator rows outside any year");
    }

    let mut records = Vec::with_capacity(months.len() * block.value_columns.len());
    for (col, category) in &block.value_columns {
        for (row, year, month) in &months {
            records.push(IndicatorRecord {
                category: category.clone(),
                year: *year,
                month: month.clone(),
                month_num: month_number(month),
                price: raw.cell(*row, *col).number(),
                annual_price: annual.get(&(category.clone(), *year)).copied(),
            });
        }
    }
    debug!(
        table = %raw.name,
        categories = block.value_columns.len(),
        annual = annual.len(),
        rows = records.len(),
        "indicator prices pivoted"
    );
    Ok(IndicatorTable { records, annual })
}

/// One grower price row compared to the annual indicator of its coffee type.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceComparison {
    pub country: String,
    pub coffee_type: Option<String>,
    pub year: i32,
    pub grower_price: Option<f64>,
    pub indicator_price: Option<f64>,
}

impl PriceComparison {
    /// Grower price as a share of the indicator price.
    pub fn share(&self) -> Option<f64> {
        match (self.grower_price, self.indicator_price) {
            (Some(grower), Some(indicator)) if indicator != 0.0 => Some(grower / indicator),
            _ => None,
        }
    }
}

/// Left-joins grower prices to annual indicator averages on coffee type and year.
pub fn compare_grower_prices(growers: &LongTable, indicator: &IndicatorTable) -> Vec<PriceComparison> {
    growers
        .records
        .iter()
        .map(|record| {
            let year = record.period.start_year();
            PriceComparison {
                country: record.entity.clone(),
                coffee_type: record.group.clone(),
                year,
                grower_price: record.value,
                indicator_price: record
                    .group
                    .as_deref()
                    .and_then(|coffee_type| indicator.annual(coffee_type, year)),
            }
        })
        .collect()
}

pub fn comparison_frame(rows: &[PriceComparison]) -> Result<DataFrame> {
    FrameBuilder::new()
        .text(columns::COUNTRY, rows.iter().map(|r| Some(r.country.clone())).collect())
        .text(columns::COFFEE_TYPE, rows.iter().map(|r| r.coffee_type.clone()).collect())
        .int(columns::CALENDAR_YEAR, years(rows.iter().map(|r| Some(r.year))))
        .float("grower_price_us_cents_lb", rows.iter().map(|r| r.grower_price).collect())
        .float(columns::INDICATOR_PRICE, rows.iter().map(|r| r.indicator_price).collect())
        .float(columns::GROWER_SHARE, rows.iter().map(PriceComparison::share).collect())
        .build()
}
