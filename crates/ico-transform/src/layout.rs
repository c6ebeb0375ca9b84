//! Per-source descriptions of where the data sits and what it becomes.

use ico_model::{Measure, MeasureKind, Membership, TimeAxis};

use crate::columns;
use crate::tagging::TagRule;
use crate::window::DataWindow;

/// Fixed column orderings of normalized tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSchema {
    ProducerCropYear,
    ProducerCalendarYear,
    Importer,
    GrowerPrice,
}

impl OutputSchema {
    /// Time axis the period columns of the source are parsed under.
    pub fn axis(self) -> TimeAxis {
        match self {
            OutputSchema::ProducerCropYear => TimeAxis::CropYear,
            OutputSchema::ProducerCalendarYear
            | OutputSchema::Importer
            | OutputSchema::GrowerPrice => TimeAxis::Calendar,
        }
    }

    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            OutputSchema::ProducerCropYear => &[
                columns::COUNTRY,
                columns::HARVEST_GROUP,
                columns::CROP_YEAR,
                columns::CROP_YEAR_BEG,
                columns::CROP_YEAR_END,
            ],
            OutputSchema::ProducerCalendarYear => &[columns::COUNTRY, columns::CALENDAR_YEAR],
            OutputSchema::Importer => &[
                columns::REGION,
                columns::COUNTRY,
                columns::ICO_MEMBER,
                columns::CALENDAR_YEAR,
            ],
            OutputSchema::GrowerPrice => &[
                columns::COUNTRY,
                columns::COFFEE_TYPE,
                columns::CALENDAR_YEAR,
            ],
        }
    }

    /// Full column list for a table of this schema carrying `measure`.
    pub fn columns(self, measure: &Measure) -> Vec<String> {
        self.key_columns()
            .iter()
            .map(|c| (*c).to_string())
            .chain(measure.columns())
            .collect()
    }

    pub fn expected_kind(self) -> MeasureKind {
        match self {
            OutputSchema::GrowerPrice => MeasureKind::Price,
            _ => MeasureKind::Volume,
        }
    }
}

/// Everything the normalizer needs to know about one source sheet.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub window: DataWindow,
    pub measure: Measure,
    pub schema: OutputSchema,
    /// Section rows tagging the entities below them with a group.
    pub group: Option<TagRule>,
    /// Section rows tagging the entities below them with a region.
    pub region: Option<TagRule>,
    pub membership: Option<Membership>,
    pub totals: Vec<String>,
    pub excluded: Vec<String>,
}

impl TableLayout {
    pub fn new(schema: OutputSchema, measure: Measure, window: DataWindow) -> Self {
        Self {
            window,
            measure,
            schema,
            group: None,
            region: None,
            membership: None,
            totals: vec!["Total".to_string()],
            excluded: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, rule: TagRule) -> Self {
        self.group = Some(rule);
        self
    }

    #[must_use]
    pub fn with_region(mut self, rule: TagRule) -> Self {
        self.region = Some(rule);
        self
    }

    #[must_use]
    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = Some(membership);
        self
    }

    #[must_use]
    pub fn excluding(mut self, labels: &[&str]) -> Self {
        self.excluded.extend(labels.iter().map(|l| (*l).to_string()));
        self
    }

    pub fn axis(&self) -> TimeAxis {
        self.schema.axis()
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        self.totals.iter().chain(&self.excluded).any(|l| l == label)
    }
}
