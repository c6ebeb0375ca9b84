//! Units of measure and the fixed conversions between them.

use serde::{Deserialize, Serialize};

/// Kilograms in one unit of the thousand-bag scale (1000 bags of 60 kg).
pub const KG_PER_1K_BAGS: f64 = 60_000.0;

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.204_622_621_85;

/// Column suffix used for price measures.
pub const PRICE_SUFFIX: &str = "us_cents_lb";

/// The three scales every volume measure is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitScale {
    /// Thousands of 60-kg bags.
    Bags1k,
    Kilograms,
    Pounds,
}

impl UnitScale {
    pub const ALL: [UnitScale; 3] = [UnitScale::Bags1k, UnitScale::Kilograms, UnitScale::Pounds];

    /// Column-name suffix for this scale.
    pub fn suffix(self) -> &'static str {
        match self {
            UnitScale::Bags1k => "1k_bags",
            UnitScale::Kilograms => "kg",
            UnitScale::Pounds => "lb",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitScale::Bags1k => "thousand 60-kg bags",
            UnitScale::Kilograms => "kilograms",
            UnitScale::Pounds => "pounds",
        }
    }

    /// Kilograms represented by one unit of this scale.
    pub fn kg_per_unit(self) -> f64 {
        match self {
            UnitScale::Bags1k => KG_PER_1K_BAGS,
            UnitScale::Kilograms => 1.0,
            UnitScale::Pounds => 1.0 / LB_PER_KG,
        }
    }

    /// Converts a thousand-bag value into this scale.
    ///
    /// Pounds are derived from kilograms, never directly from bags, so that
    /// `lb == kg * LB_PER_KG` holds exactly for every row.
    pub fn from_bags(self, bags_1k: f64) -> f64 {
        match self {
            UnitScale::Bags1k => bags_1k,
            UnitScale::Kilograms => bags_1k * KG_PER_1K_BAGS,
            UnitScale::Pounds => bags_1k * KG_PER_1K_BAGS * LB_PER_KG,
        }
    }
}

/// What a measure column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    /// Physical volume, published in all three [`UnitScale`]s.
    Volume,
    /// Price in US cents per pound; a single column.
    Price,
}

/// A named measure such as `production` or `grower_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,
    pub kind: MeasureKind,
}

impl Measure {
    pub fn volume(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MeasureKind::Volume,
        }
    }

    pub fn price(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MeasureKind::Price,
        }
    }

    /// Column name for a volume measure at the given scale.
    pub fn column(&self, scale: UnitScale) -> String {
        format!("{}_{}", self.name, scale.suffix())
    }

    /// Column name for a price measure.
    pub fn price_column(&self) -> String {
        format!("{}_{PRICE_SUFFIX}", self.name)
    }

    /// All value columns this measure contributes, in contract order.
    pub fn columns(&self) -> Vec<String> {
        match self.kind {
            MeasureKind::Volume => UnitScale::ALL.iter().map(|s| self.column(*s)).collect(),
            MeasureKind::Price => vec![self.price_column()],
        }
    }
}
