//! Time axes and period keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which time axis a source table is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAxis {
    /// Production/harvest years labelled `YYYY/YY`.
    CropYear,
    /// Plain calendar years.
    Calendar,
}

impl TimeAxis {
    /// Name of the period column in output tables.
    pub fn column(self) -> &'static str {
        match self {
            TimeAxis::CropYear => "crop_year",
            TimeAxis::Calendar => "calendar_year",
        }
    }
}

/// A single period key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    /// A crop year such as `1990/91`; `start` is the first calendar year.
    CropYear { label: String, start: i32 },
    Calendar(i32),
}

impl Period {
    /// Parses a period label under the given axis.
    ///
    /// Crop-year labels are keyed on their first four characters.
    pub fn parse(axis: TimeAxis, label: &str) -> Option<Self> {
        let label = label.trim();
        match axis {
            TimeAxis::CropYear => {
                let start = label.get(0..4)?.parse::<i32>().ok()?;
                Some(Period::CropYear {
                    label: label.to_string(),
                    start,
                })
            }
            TimeAxis::Calendar => label.parse::<i32>().ok().map(Period::Calendar),
        }
    }

    /// The calendar year the period starts in.
    pub fn start_year(&self) -> i32 {
        match self {
            Period::CropYear { start, .. } => *start,
            Period::Calendar(year) => *year,
        }
    }

    /// The calendar year a crop year ends in; calendar periods end where they start.
    pub fn end_year(&self) -> i32 {
        match self {
            Period::CropYear { start, .. } => start + 1,
            Period::Calendar(year) => *year,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::CropYear { label, .. } => f.write_str(label),
            Period::Calendar(year) => write!(f, "{year}"),
        }
    }
}
