//! DataFrame construction from typed column vectors.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use ico_model::{Measure, UnitScale};

use crate::error::Result;

/// Accumulates named columns in contract order and builds a [`DataFrame`].
#[derive(Debug, Default)]
pub struct FrameBuilder {
    columns: Vec<Column>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, values: Vec<Option<String>>) -> Self {
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    #[must_use]
    pub fn int(mut self, name: &str, values: Vec<Option<i64>>) -> Self {
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    #[must_use]
    pub fn float(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.columns.push(Series::new(name.into(), values).into());
        self
    }

    /// Adds the three scale columns of a volume measure from thousand-bag values.
    #[must_use]
    pub fn volume(mut self, measure: &Measure, bags_1k: &[Option<f64>]) -> Self {
        for scale in UnitScale::ALL {
            let values: Vec<Option<f64>> = bags_1k
                .iter()
                .map(|value| value.map(|v| scale.from_bags(v)))
                .collect();
            self = self.float(&measure.column(scale), values);
        }
        self
    }

    /// Adds one column per scale from already-scaled values.
    #[must_use]
    pub fn scaled(mut self, name: &str, values: [Vec<Option<f64>>; 3]) -> Self {
        for (scale, values) in UnitScale::ALL.into_iter().zip(values) {
            self = self.float(&format!("{name}_{}", scale.suffix()), values);
        }
        self
    }

    pub fn build(self) -> Result<DataFrame> {
        Ok(DataFrame::new(self.columns)?)
    }
}

/// Converts an `i32` year vector into the `Int64` column representation.
pub fn years(values: impl IntoIterator<Item = Option<i32>>) -> Vec<Option<i64>> {
    values.into_iter().map(|v| v.map(i64::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_adds_three_derived_columns() {
        let df = FrameBuilder::new()
            .text("country", vec![Some("Brazil".to_string()), None])
            .volume(&Measure::volume("production"), &[Some(2.0), None])
            .build()
            .unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["country", "production_1k_bags", "production_kg", "production_lb"]
        );
        let kg = df.column("production_kg").unwrap().f64().unwrap();
        assert_eq!(kg.get(0), Some(120_000.0));
        assert_eq!(kg.get(1), None);
    }

    #[test]
    fn duplicate_column_names_are_rejected() {
        let result = FrameBuilder::new()
            .int("year", vec![Some(1)])
            .int("year", vec![Some(2)])
            .build();
        assert!(result.is_err());
    }
}
