//! Named input sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The fixed set of spreadsheets the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    TotalProduction,
    DomesticConsumption,
    GrossOpeningStocks,
    ExportsCropYear,
    ExportsCalendarYear,
    Imports,
    ReExports,
    NonMemberImports,
    NonMemberReExports,
    IndicatorPrices,
    GrowerPrices,
}

impl SourceKind {
    pub const ALL: [SourceKind; 11] = [
        SourceKind::TotalProduction,
        SourceKind::DomesticConsumption,
        SourceKind::GrossOpeningStocks,
        SourceKind::ExportsCropYear,
        SourceKind::ExportsCalendarYear,
        SourceKind::Imports,
        SourceKind::ReExports,
        SourceKind::NonMemberImports,
        SourceKind::NonMemberReExports,
        SourceKind::IndicatorPrices,
        SourceKind::GrowerPrices,
    ];

    /// Key derived from the source file name, also used for interim outputs.
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::TotalProduction => "total_production",
            SourceKind::DomesticConsumption => "domestic_consumption",
            SourceKind::GrossOpeningStocks => "gross_opening_stocks",
            SourceKind::ExportsCropYear => "exports_crop_year",
            SourceKind::ExportsCalendarYear => "exports_calendar_year",
            SourceKind::Imports => "imports",
            SourceKind::ReExports => "re_exports",
            SourceKind::NonMemberImports => "non_member_imports",
            SourceKind::NonMemberReExports => "non_member_re_exports",
            SourceKind::IndicatorPrices => "indicator_prices",
            SourceKind::GrowerPrices => "prices_paid_to_growers",
        }
    }

    /// Price sources feed only the price comparison and may be absent.
    pub fn is_required(self) -> bool {
        !matches!(self, SourceKind::IndicatorPrices | SourceKind::GrowerPrices)
    }

    pub fn required() -> impl Iterator<Item = SourceKind> {
        Self::ALL.into_iter().filter(|kind| kind.is_required())
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| ModelError::UnknownSource(s.to_string()))
    }
}
