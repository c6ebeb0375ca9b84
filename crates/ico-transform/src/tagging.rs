//! Tag propagation over sentinel-delimited sequences.
//!
//! Source sheets group their rows under section labels: harvest cohorts
//! (`April group`), geographic regions (`Africa`), coffee types, or a year
//! row heading the twelve monthly rows that follow it. All of these are the
//! same operation: a label row opens a section, its (transformed) label is
//! forward-filled onto every following row until the next label row, and the
//! label row itself is not data.

use std::sync::LazyLock;

use regex::Regex;

static GROUP_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*group$").expect("valid group suffix pattern"));
static YEAR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid year pattern"));

/// Result of propagation for one position of the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSlot {
    /// A section label row, with its transformed tag.
    Header(String),
    /// A data row carrying the tag of the nearest preceding header, if any.
    Item(Option<String>),
}

impl TagSlot {
    pub fn is_header(&self) -> bool {
        matches!(self, TagSlot::Header(_))
    }

    /// Tag carried by this position; headers carry their own tag.
    pub fn tag(&self) -> Option<&str> {
        match self {
            TagSlot::Header(tag) => Some(tag),
            TagSlot::Item(tag) => tag.as_deref(),
        }
    }
}

/// Forward-fills section tags over a sequence of row labels.
///
/// `is_label` decides whether a label opens a section and `transform` maps it
/// to the tag value. Rows without a label inherit the current tag.
pub fn propagate_tags<I, S, M, F>(labels: I, is_label: M, transform: F) -> Vec<TagSlot>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
    M: Fn(&str) -> bool,
    F: Fn(&str) -> String,
{
    let mut current: Option<String> = None;
    labels
        .into_iter()
        .map(|label| match label {
            Some(label) if is_label(label.as_ref()) => {
                let tag = transform(label.as_ref());
                current = Some(tag.clone());
                TagSlot::Header(tag)
            }
            _ => TagSlot::Item(current.clone()),
        })
        .collect()
}

/// Which labels open a section.
#[derive(Debug, Clone)]
pub enum TagMatcher {
    /// Exact membership in a fixed vocabulary.
    Vocabulary(Vec<String>),
    /// A four-digit year.
    Year,
}

impl TagMatcher {
    pub fn vocabulary(labels: &[&str]) -> Self {
        Self::Vocabulary(labels.iter().map(|l| (*l).to_string()).collect())
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            TagMatcher::Vocabulary(labels) => labels.iter().any(|l| l == label),
            TagMatcher::Year => YEAR_LABEL.is_match(label),
        }
    }
}

/// How a matched label becomes a tag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTransform {
    Identity,
    /// `"April group"` → `"April"`.
    StripGroupSuffix,
}

impl TagTransform {
    pub fn apply(self, label: &str) -> String {
        match self {
            TagTransform::Identity => label.to_string(),
            TagTransform::StripGroupSuffix => GROUP_SUFFIX.replace(label, "").into_owned(),
        }
    }
}

/// A named tag column derived by propagation.
#[derive(Debug, Clone)]
pub struct TagRule {
    pub matcher: TagMatcher,
    pub transform: TagTransform,
}

impl TagRule {
    pub fn new(matcher: TagMatcher, transform: TagTransform) -> Self {
        Self { matcher, transform }
    }

    pub fn apply<I, S>(&self, labels: I) -> Vec<TagSlot>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        propagate_tags(
            labels,
            |label| self.matcher.matches(label),
            |label| self.transform.apply(label),
        )
    }
}
