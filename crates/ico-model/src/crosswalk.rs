//! Name crosswalks between independently maintained datasets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A one-directional name mapping with identity fallback.
///
/// The mapping is a function (one target per source) and is idempotent:
/// mapping an already-mapped name leaves it unchanged.
///
/// Serialized as a plain `{ "source": "target" }` map; deserializing runs
/// the same checks as [`Crosswalk::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Crosswalk {
    entries: BTreeMap<String, String>,
}

impl Crosswalk {
    /// Builds a crosswalk from `(source, target)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error when a source is listed with two different targets,
    /// or when a target is itself a source mapped to a different name.
    pub fn new<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut entries: BTreeMap<String, String> = BTreeMap::new();
        for (source, target) in pairs {
            let source = source.into();
            let target = target.into();
            if let Some(existing) = entries.get(&source)
                && existing != &target
            {
                return Err(ModelError::CrosswalkConflict {
                    source_name: source,
                    first: existing.clone(),
                    second: target,
                });
            }
            entries.insert(source, target);
        }
        for (source, target) in &entries {
            if let Some(remapped) = entries.get(target)
                && remapped != target
            {
                return Err(ModelError::CrosswalkNotIdempotent {
                    source_name: source.clone(),
                    target: target.clone(),
                    remapped: remapped.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Maps a name, returning it verbatim when it has no entry.
    pub fn map<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map_or(name, String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for Crosswalk {
    type Error = ModelError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<Crosswalk> for BTreeMap<String, String> {
    fn from(crosswalk: Crosswalk) -> Self {
        crosswalk.entries
    }
}

/// A dissolved entity whose demographic series is the sum of its successors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateEntity {
    pub name: String,
    pub constituents: Vec<String>,
}

impl AggregateEntity {
    pub fn new<I, S>(name: impl Into<String>, constituents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constituents: constituents.into_iter().map(Into::into).collect(),
        }
    }
}
