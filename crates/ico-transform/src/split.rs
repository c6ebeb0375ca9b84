//! Disaggregation of a historically merged reporting entity.
//!
//! Before the cutover year some sources report two successor entities as one
//! merged entity. The merged series is split with the pooled share of the
//! first successor over the years where both successors report. The share is
//! assumed stable over the whole pre-split history.

use std::collections::HashMap;

use tracing::{debug, info};

use ico_model::{LongRecord, Period};

use crate::error::{Result, TransformError};
use crate::table::LongTable;

/// A merged entity and the two successors it is split into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRule {
    pub merged: String,
    pub first: String,
    pub second: String,
    /// First year in which the successors report separately.
    pub cutover_year: i32,
}

impl SplitRule {
    pub fn new(
        merged: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
        cutover_year: i32,
    ) -> Self {
        Self {
            merged: merged.into(),
            first: first.into(),
            second: second.into(),
            cutover_year,
        }
    }

    /// Share of the first successor, pooled over the overlap window.
    ///
    /// Only periods at or after the cutover where both successors carry a
    /// value contribute.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SplitRatioUnavailable`] when no period
    /// qualifies or the pooled total is zero.
    pub fn pooled_ratio(&self, records: &[LongRecord]) -> Result<f64> {
        let second: HashMap<&Period, f64> = records
            .iter()
            .filter(|r| r.entity == self.second)
            .filter_map(|r| r.value.map(|v| (&r.period, v)))
            .collect();

        let mut first_total = 0.0;
        let mut both_total = 0.0;
        let mut periods = 0usize;
        for record in records.iter().filter(|r| r.entity == self.first) {
            if record.period.start_year() < self.cutover_year {
                continue;
            }
            if let (Some(a), Some(b)) = (record.value, second.get(&record.period)) {
                first_total += a;
                both_total += a + b;
                periods += 1;
            }
        }

        if periods == 0 {
            return Err(self.unavailable(format!(
                "no period from {} onwards reports both '{}' and '{}'",
                self.cutover_year, self.first, self.second
            )));
        }
        if both_total == 0.0 {
            return Err(self.unavailable(format!(
                "'{}' and '{}' sum to zero over {periods} overlapping periods",
                self.first, self.second
            )));
        }
        Ok(first_total / both_total)
    }

    /// Replaces the merged entity with synthesized successor values.
    ///
    /// Synthesized values only fill successor records whose value is null;
    /// periods without any successor record get new records copied from the
    /// merged one. The merged entity does not appear in the result. Tables
    /// that never mention the merged entity pass through unchanged.
    pub fn resolve(&self, mut table: LongTable) -> Result<LongTable> {
        if !table.records.iter().any(|r| r.entity == self.merged) {
            debug!(table = %table.name, merged = %self.merged, "no merged rows to split");
            return Ok(table);
        }
        let ratio = self.pooled_ratio(&table.records)?;
        info!(table = %table.name, merged = %self.merged, ratio, "splitting merged entity");

        let (merged, mut records): (Vec<LongRecord>, Vec<LongRecord>) = table
            .records
            .into_iter()
            .partition(|r| r.entity == self.merged);

        let index: HashMap<(String, Period), usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.entity.clone(), r.period.clone()), i))
            .collect();

        let mut appended = Vec::new();
        for source in &merged {
            let Some(value) = source.value else {
                continue;
            };
            for (entity, share) in [(&self.first, ratio), (&self.second, 1.0 - ratio)] {
                let synthesized = value * share;
                match index.get(&(entity.clone(), source.period.clone())) {
                    Some(&i) => {
                        let target = &mut records[i];
                        target.value = target.value.or(Some(synthesized));
                    }
                    None => appended.push(LongRecord {
                        entity: entity.clone(),
                        value: Some(synthesized),
                        ..source.clone()
                    }),
                }
            }
        }
        debug!(
            table = %table.name,
            merged_rows = merged.len(),
            appended = appended.len(),
            "merged entity resolved"
        );
        records.extend(appended);
        table.records = records;
        Ok(table)
    }

    fn unavailable(&self, reason: String) -> TransformError {
        TransformError::SplitRatioUnavailable {
            merged: self.merged.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ico_model::{Measure, Membership};
    use proptest::prelude::*;

    use crate::layout::OutputSchema;

    fn rule() -> SplitRule {
        SplitRule::new("Belgium/Luxembourg", "Belgium", "Luxembourg", 1999)
    }

    fn record(entity: &str, year: i32, value: Option<f64>) -> LongRecord {
        let mut record = LongRecord::new(entity, Period::Calendar(year), value);
        record.region = Some("Europe".to_string());
        record.membership = Some(Membership::Member);
        record
    }

    fn table(records: Vec<LongRecord>) -> LongTable {
        LongTable::new("imports", Measure::volume("imports"), OutputSchema::Importer, records)
    }

    fn value_of(table: &LongTable, entity: &str, year: i32) -> Option<f64> {
        table
            .records
            .iter()
            .find(|r| r.entity == entity && r.period == Period::Calendar(year))
            .and_then(|r| r.value)
    }

    #[test]
    fn splits_with_pooled_ratio() {
        let input = table(vec![
            record("Belgium/Luxembourg", 1998, Some(100.0)),
            record("Belgium", 1998, None),
            record("Luxembourg", 1998, None),
            record("Belgium", 1999, Some(80.0)),
            record("Luxembourg", 1999, Some(20.0)),
        ]);
        let output = rule().resolve(input).unwrap();

        assert!(output.records.iter().all(|r| r.entity != "Belgium/Luxembourg"));
        let belgium = value_of(&output, "Belgium", 1998).unwrap();
        let luxembourg = value_of(&output, "Luxembourg", 1998).unwrap();
        assert!((belgium - 80.0).abs() < 1e-9);
        assert!((luxembourg - 20.0).abs() < 1e-9);
        assert_eq!(value_of(&output, "Belgium", 1999), Some(80.0));
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn ratio_pools_sums_rather_than_averaging_shares() {
        let records = vec![
            record("Belgium", 1999, Some(90.0)),
            record("Luxembourg", 1999, Some(10.0)),
            record("Belgium", 2000, Some(1.0)),
            record("Luxembourg", 2000, Some(9.0)),
            record("Belgium", 1990, Some(1.0)),
            record("Luxembourg", 1990, Some(0.0)),
        ];
        let ratio = rule().pooled_ratio(&records).unwrap();
        assert!((ratio - 91.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn existing_successor_values_are_kept() {
        let input = table(vec![
            record("Belgium/Luxembourg", 1998, Some(100.0)),
            record("Belgium", 1998, Some(70.0)),
            record("Belgium", 1999, Some(50.0)),
            record("Luxembourg", 1999, Some(50.0)),
        ]);
        let output = rule().resolve(input).unwrap();
        assert_eq!(value_of(&output, "Belgium", 1998), Some(70.0));
        let luxembourg = value_of(&output, "Luxembourg", 1998).unwrap();
        assert!((luxembourg - 50.0).abs() < 1e-9);
    }

    #[test]
    fn missing_successor_rows_are_appended_with_merged_tags() {
        let input = table(vec![
            record("Belgium/Luxembourg", 1990, Some(10.0)),
            record("Belgium", 1999, Some(3.0)),
            record("Luxembourg", 1999, Some(1.0)),
        ]);
        let output = rule().resolve(input).unwrap();
        let appended = output
            .records
            .iter()
            .find(|r| r.entity == "Luxembourg" && r.period == Period::Calendar(1990))
            .unwrap();
        assert_eq!(appended.value, Some(2.5));
        assert_eq!(appended.region.as_deref(), Some("Europe"));
        assert_eq!(appended.membership, Some(Membership::Member));
    }

    #[test]
    fn no_overlap_is_fatal() {
        let input = table(vec![
            record("Belgium/Luxembourg", 1998, Some(100.0)),
            record("Belgium", 1999, Some(80.0)),
            record("Luxembourg", 1999, None),
        ]);
        let err = rule().resolve(input).unwrap_err();
        assert!(matches!(err, TransformError::SplitRatioUnavailable { .. }));
    }

    #[test]
    fn zero_total_is_fatal() {
        let records = vec![record("Belgium", 2001, Some(0.0)), record("Luxembourg", 2001, Some(0.0))];
        assert!(rule().pooled_ratio(&records).is_err());
    }

    #[test]
    fn tables_without_merged_entity_pass_through() {
        let input = table(vec![record("Austria", 1990, Some(1.0))]);
        let output = rule().resolve(input.clone()).unwrap();
        assert_eq!(output, input);
    }

    proptest! {
        #[test]
        fn split_conserves_the_merged_value(
            merged in 0.0f64..1.0e6,
            a in 0.0f64..1.0e4,
            b in 0.0f64..1.0e4,
        ) {
            prop_assume!(a + b > 0.0);
            let input = table(vec![
                record("Belgium/Luxembourg", 1995, Some(merged)),
                record("Belgium", 2000, Some(a)),
                record("Luxembourg", 2000, Some(b)),
            ]);
            let ratio = rule().pooled_ratio(&input.records).unwrap();
            prop_assert!((0.0..=1.0).contains(&ratio));

            let output = rule().resolve(input).unwrap();
            let first = value_of(&output, "Belgium", 1995).unwrap();
            let second = value_of(&output, "Luxembourg", 1995).unwrap();
            prop_assert!((first + second - merged).abs() <= 1e-9 * merged.max(1.0));
        }
    }
}
