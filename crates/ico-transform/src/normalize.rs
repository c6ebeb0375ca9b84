//! Wide-to-long normalization of source sheets.
//!
//! A source sheet is a wide block: one row per entity, one column per
//! period, with section rows (harvest groups, regions, coffee types) and
//! total rows mixed into the entity column. Normalization locates the block,
//! tags every entity with its section, drops section, total and excluded
//! rows, and unpivots the periods into one [`LongRecord`] per cell.

use std::collections::HashSet;

use tracing::{debug, warn};

use ico_model::{LongRecord, Period, RawTable};

use crate::block::WideBlock;
use crate::error::{Result, TransformError};
use crate::layout::TableLayout;
use crate::table::LongTable;
use crate::tagging::{TagRule, TagSlot};

/// Converts a raw sheet into a long table according to `layout`.
///
/// Cell values that do not parse as numbers become nulls. Period labels are
/// keys and must parse under the layout's time axis.
///
/// # Errors
///
/// Returns [`TransformError::SchemaMismatch`] when the data window cannot be
/// located, a period header does not parse, or two records share a key.
pub fn normalize(raw: &RawTable, layout: &TableLayout) -> Result<LongTable> {
    let block = WideBlock::extract(raw, &layout.window)?;
    let axis = layout.axis();

    let periods = block
        .value_columns
        .iter()
        .map(|(col, label)| {
            Period::parse(axis, label).map(|period| (*col, period)).ok_or_else(|| {
                TransformError::schema(
                    &raw.name,
                    format!("header '{label}' in column {col} is not a {} label", axis.column()),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let labels = block.entity_labels(raw);
    let groups = tag_slots(layout.group.as_ref(), &labels);
    let regions = tag_slots(layout.region.as_ref(), &labels);

    let mut entities = Vec::with_capacity(block.rows.len());
    let mut unlabelled = 0usize;
    for (index, &row) in block.rows.iter().enumerate() {
        if groups[index].is_header() || regions[index].is_header() {
            continue;
        }
        let Some(entity) = labels[index].as_deref() else {
            unlabelled += 1;
            continue;
        };
        if layout.is_excluded(entity) {
            continue;
        }
        entities.push((row, entity, groups[index].tag(), regions[index].tag()));
    }
    if unlabelled > 0 {
        warn!(table = %raw.name, rows = unlabelled, "skipping data rows without an entity label");
    }

    let mut records = Vec::with_capacity(periods.len() * entities.len());
    for (col, period) in &periods {
        for (row, entity, group, region) in &entities {
            records.push(LongRecord {
                entity: (*entity).to_string(),
                group: group.map(str::to_string),
                region: region.map(str::to_string),
                membership: layout.membership,
                period: period.clone(),
                value: raw.cell(*row, *col).number(),
            });
        }
    }

    ensure_unique(&raw.name, &records)?;
    debug!(
        table = %raw.name,
        entities = entities.len(),
        periods = periods.len(),
        rows = records.len(),
        "normalized"
    );
    Ok(LongTable::new(
        raw.name.clone(),
        layout.measure.clone(),
        layout.schema,
        records,
    ))
}

fn tag_slots(rule: Option<&TagRule>, labels: &[Option<String>]) -> Vec<TagSlot> {
    match rule {
        Some(rule) => rule.apply(labels.iter().map(Option::as_deref)),
        None => vec![TagSlot::Item(None); labels.len()],
    }
}

fn ensure_unique(table: &str, records: &[LongRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let key = record.key();
        if !seen.insert(key.clone()) {
            return Err(TransformError::schema(table, format!("duplicate record for {key}")));
        }
    }
    Ok(())
}
