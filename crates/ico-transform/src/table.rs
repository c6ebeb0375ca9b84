//! Normalized long tables and their materialization as DataFrames.

use polars::prelude::DataFrame;

use ico_model::{LongRecord, Measure, MeasureKind, Membership, Period};

use crate::columns;
use crate::error::{Result, TransformError};
use crate::frame::{FrameBuilder, years};
use crate::layout::OutputSchema;

/// Output of the normalizer: one record per (entity, period[, group]).
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    pub name: String,
    pub measure: Measure,
    pub schema: OutputSchema,
    pub records: Vec<LongRecord>,
}

impl LongTable {
    pub fn new(
        name: impl Into<String>,
        measure: Measure,
        schema: OutputSchema,
        records: Vec<LongRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            measure,
            schema,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Materializes the table in its schema's fixed column order.
    pub fn to_frame(&self) -> Result<DataFrame> {
        if self.measure.kind != self.schema.expected_kind() {
            return Err(TransformError::schema(
                &self.name,
                format!("measure '{}' does not fit {:?}", self.measure.name, self.schema),
            ));
        }
        let records = &self.records;
        let builder = match self.schema {
            OutputSchema::ProducerCropYear => FrameBuilder::new()
                .text(columns::COUNTRY, entities(records))
                .text(columns::HARVEST_GROUP, groups(records))
                .text(columns::CROP_YEAR, crop_year_labels(records))
                .int(columns::CROP_YEAR_BEG, years(records.iter().map(|r| Some(r.period.start_year()))))
                .int(columns::CROP_YEAR_END, years(records.iter().map(|r| Some(r.period.end_year())))),
            OutputSchema::ProducerCalendarYear => FrameBuilder::new()
                .text(columns::COUNTRY, entities(records))
                .int(columns::CALENDAR_YEAR, calendar_years(records)),
            OutputSchema::Importer => FrameBuilder::new()
                .text(columns::REGION, regions(records))
                .text(columns::COUNTRY, entities(records))
                .text(columns::ICO_MEMBER, memberships(records))
                .int(columns::CALENDAR_YEAR, calendar_years(records)),
            OutputSchema::GrowerPrice => FrameBuilder::new()
                .text(columns::COUNTRY, entities(records))
                .text(columns::COFFEE_TYPE, groups(records))
                .int(columns::CALENDAR_YEAR, calendar_years(records)),
        };
        let values = self.values();
        let builder = match self.measure.kind {
            MeasureKind::Volume => builder.volume(&self.measure, &values),
            MeasureKind::Price => builder.float(&self.measure.price_column(), values),
        };
        builder.build()
    }
}

pub(crate) fn entities(records: &[LongRecord]) -> Vec<Option<String>> {
    records.iter().map(|r| Some(r.entity.clone())).collect()
}

pub(crate) fn groups(records: &[LongRecord]) -> Vec<Option<String>> {
    records.iter().map(|r| r.group.clone()).collect()
}

pub(crate) fn regions(records: &[LongRecord]) -> Vec<Option<String>> {
    records.iter().map(|r| r.region.clone()).collect()
}

pub(crate) fn memberships(records: &[LongRecord]) -> Vec<Option<String>> {
    records
        .iter()
        .map(|r| r.membership.map(Membership::as_str).map(str::to_string))
        .collect()
}

pub(crate) fn calendar_years(records: &[LongRecord]) -> Vec<Option<i64>> {
    years(records.iter().map(|r| Some(r.period.start_year())))
}

pub(crate) fn crop_year_labels(records: &[LongRecord]) -> Vec<Option<String>> {
    records
        .iter()
        .map(|r| match &r.period {
            Period::CropYear { label, .. } => Some(label.clone()),
            Period::Calendar(year) => Some(year.to_string()),
        })
        .collect()
}
