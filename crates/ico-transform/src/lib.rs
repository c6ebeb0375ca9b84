//! Normalization and harmonization engine for coffee trade statistics.
//!
//! Source sheets arrive as [`RawTable`](ico_model::RawTable)s. Each is
//! located ([`window`]), header-promoted ([`block`]), tagged and unpivoted
//! ([`normalize`]) into a [`LongTable`]. Merged entities are split
//! ([`split`]), producer stocks are rolled forward ([`rollforward`]),
//! population is overlaid across naming conventions ([`harmonize`]) and the
//! indicator sheet is pivoted ([`indicator`]). [`pipeline::harmonize`] wires
//! the fixed topology together.

pub mod assemble;
pub mod block;
pub mod catalog;
pub mod columns;
pub mod error;
pub mod frame;
pub mod harmonize;
pub mod indicator;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod rollforward;
pub mod split;
pub mod table;
pub mod tagging;
pub mod window;

pub use error::{Result, TransformError};
pub use harmonize::{PopulationOverlay, PopulationTable, synthesize_aggregates};
pub use indicator::{IndicatorRecord, IndicatorTable, pivot_indicator};
pub use layout::{OutputSchema, TableLayout};
pub use normalize::normalize;
pub use pipeline::{HarmonizedTables, NamedFrame, SourceTables, harmonize};
pub use rollforward::{BalanceRow, BalancedRow, StockFlows, StockPosition, rollforward};
pub use split::SplitRule;
pub use table::LongTable;
pub use tagging::{TagMatcher, TagRule, TagSlot, TagTransform, propagate_tags};
pub use window::{DataWindow, WindowEnd};
