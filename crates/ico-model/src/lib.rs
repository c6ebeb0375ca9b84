//! Data model for coffee trade-statistics harmonization.
//!
//! Types shared between the readers, the normalization engine and the
//! writers: raw spreadsheet cells, long-format records, unit scales, period
//! keys, name crosswalks and run options.

pub mod crosswalk;
pub mod error;
pub mod numeric;
pub mod options;
pub mod period;
pub mod raw;
pub mod record;
pub mod source;
pub mod units;

pub use crosswalk::{AggregateEntity, Crosswalk};
pub use error::{ModelError, Result};
pub use numeric::{format_numeric, parse_f64};
pub use options::PipelineOptions;
pub use period::{Period, TimeAxis};
pub use raw::{RawCell, RawTable};
pub use record::{LongRecord, Membership, PopulationRecord, RecordKey};
pub use source::SourceKind;
pub use units::{KG_PER_1K_BAGS, LB_PER_KG, Measure, MeasureKind, UnitScale};
