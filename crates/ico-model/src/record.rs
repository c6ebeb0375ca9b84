//! Long-format records produced by the normalizer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Whether a reporting entity belongs to the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Membership {
    Member,
    NonMember,
}

impl Membership {
    pub fn as_str(self) -> &'static str {
        match self {
            Membership::Member => "member",
            Membership::NonMember => "non-member",
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (entity, period) observation.
///
/// `value` is in the measure's base scale: thousand-bag counts for volumes,
/// US cents per pound for prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub entity: String,
    pub group: Option<String>,
    pub region: Option<String>,
    pub membership: Option<Membership>,
    pub period: Period,
    pub value: Option<f64>,
}

impl LongRecord {
    pub fn new(entity: impl Into<String>, period: Period, value: Option<f64>) -> Self {
        Self {
            entity: entity.into(),
            group: None,
            region: None,
            membership: None,
            period,
            value,
        }
    }

    /// Identity of the record within one normalized table.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            entity: self.entity.clone(),
            group: self.group.clone(),
            period: self.period.clone(),
        }
    }
}

/// Unique key of a record within a normalized table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub entity: String,
    pub group: Option<String>,
    pub period: Period,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{} [{}] {}", self.entity, group, self.period),
            None => write!(f, "{} {}", self.entity, self.period),
        }
    }
}

/// Demographic observation for one entity and year, in head counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub country: String,
    pub year: i32,
    /// Population on 1 January.
    pub population_boy: Option<f64>,
    /// Population on 1 July.
    pub population_mid: Option<f64>,
}
