//! Stock rollforward and reconciliation against reported opening stocks.

use ico_model::{Period, UnitScale};

/// One producer balance row, all flows in thousand-bag units.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub country: String,
    pub harvest_group: Option<String>,
    pub period: Period,
    pub openstock: Option<f64>,
    pub production: Option<f64>,
    pub consumption: Option<f64>,
    pub exports: Option<f64>,
}

impl BalanceRow {
    /// The flow equation inputs expressed in `scale`.
    pub fn flows(&self, scale: UnitScale) -> StockFlows {
        let convert = |value: Option<f64>| value.map(|v| scale.from_bags(v));
        StockFlows {
            opening: convert(self.openstock),
            production: convert(self.production),
            consumption: convert(self.consumption),
            exports: convert(self.exports),
        }
    }
}

/// Inputs of the flow equation in a single unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StockFlows {
    pub opening: Option<f64>,
    pub production: Option<f64>,
    pub consumption: Option<f64>,
    pub exports: Option<f64>,
}

impl StockFlows {
    /// Implied closing stock, rounded to two decimals and floored at zero.
    ///
    /// Null when any input is null, not the zero that a NaN-ignoring
    /// maximum against 0 would give.
    pub fn closing(&self) -> Option<f64> {
        let raw = self.opening? + self.production? - self.consumption? - self.exports?;
        let rounded = round_half_even(raw, 2);
        Some(if rounded <= 0.0 { 0.0 } else { rounded })
    }
}

/// Calculated and reported closing stock of one row in one scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StockPosition {
    pub closing_calculated: Option<f64>,
    /// Opening stock reported for the next period of the same country.
    pub closing_next: Option<f64>,
}

impl StockPosition {
    /// Reported minus calculated closing stock.
    pub fn adjustment(&self) -> Option<f64> {
        Some(self.closing_next? - self.closing_calculated?)
    }
}

/// A balance row with its stock positions, indexed like [`UnitScale::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedRow {
    pub row: BalanceRow,
    pub positions: [StockPosition; 3],
}

/// Rounds half to even at `decimals` places.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Sorts rows by country and crop year and computes their stock positions.
///
/// The sort is stable, so rows sharing a country and start year keep their
/// input order. The next-period opening stock is taken from the following
/// row of the same country; the last period of each country has none.
pub fn rollforward(mut rows: Vec<BalanceRow>) -> Vec<BalancedRow> {
    rows.sort_by(|a, b| {
        a.country
            .cmp(&b.country)
            .then_with(|| a.period.start_year().cmp(&b.period.start_year()))
    });

    let positions: Vec<[StockPosition; 3]> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let next = rows.get(i + 1).filter(|next| next.country == row.country);
            UnitScale::ALL.map(|scale| StockPosition {
                closing_calculated: row.flows(scale).closing(),
                closing_next: next.and_then(|n| n.flows(scale).opening),
            })
        })
        .collect();

    rows.into_iter()
        .zip(positions)
        .map(|(row, positions)| BalancedRow { row, positions })
        .collect()
}
