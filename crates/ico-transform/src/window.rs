//! Location of the rectangular data block inside a raw sheet.
//!
//! Source sheets carry title rows above the header and totals or footnotes
//! below the data. The block is bounded by sentinel rows (a `Total` row), with
//! an optional fixed end that overrides the search for sheets whose extent is
//! known. A fixed end that disagrees with the sentinel position means the
//! sheet layout changed and is reported instead of being silently mis-sliced.

use std::ops::Range;

use ico_model::RawTable;

use crate::error::{Result, TransformError};

/// How the end of the data block is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEnd {
    /// End at the first row whose label is one of the sentinels.
    Sentinel(Vec<String>),
    /// End at a fixed row; a sentinel, if present, must sit at `end - 1` or `end`.
    Fixed { end: usize, sentinels: Vec<String> },
    /// Run to the last row of the sheet.
    ToEnd,
}

/// Header row and data extent of one sheet layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataWindow {
    /// Absolute row holding the column labels.
    pub header_row: usize,
    /// Absolute row of the first data row.
    pub first_row: usize,
    pub end: WindowEnd,
}

impl DataWindow {
    pub fn sentinel(header_row: usize, first_row: usize, sentinels: &[&str]) -> Self {
        Self {
            header_row,
            first_row,
            end: WindowEnd::Sentinel(to_owned(sentinels)),
        }
    }

    pub fn fixed(header_row: usize, first_row: usize, end: usize, sentinels: &[&str]) -> Self {
        Self {
            header_row,
            first_row,
            end: WindowEnd::Fixed {
                end,
                sentinels: to_owned(sentinels),
            },
        }
    }

    pub fn to_end(header_row: usize, first_row: usize) -> Self {
        Self {
            header_row,
            first_row,
            end: WindowEnd::ToEnd,
        }
    }

    /// Resolves the data rows of `raw` as a half-open range.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SchemaMismatch`] when the header row is out of
    /// range, no sentinel is found, or a fixed end disagrees with the sentinel.
    pub fn resolve(&self, raw: &RawTable) -> Result<Range<usize>> {
        let height = raw.height();
        if self.header_row >= height {
            return Err(TransformError::schema(
                &raw.name,
                format!(
                    "header row {} is beyond the {height} rows of the sheet",
                    self.header_row
                ),
            ));
        }

        let end = match &self.end {
            WindowEnd::ToEnd => height,
            WindowEnd::Sentinel(sentinels) => {
                find_sentinel(raw, self.first_row, sentinels).ok_or_else(|| {
                    TransformError::schema(
                        &raw.name,
                        format!(
                            "no {} row at or after row {}",
                            quote_all(sentinels),
                            self.first_row
                        ),
                    )
                })?
            }
            WindowEnd::Fixed { end, sentinels } => {
                if *end > height {
                    return Err(TransformError::schema(
                        &raw.name,
                        format!("fixed data end {end} is beyond the {height} rows of the sheet"),
                    ));
                }
                match find_sentinel(raw, self.first_row, sentinels) {
                    Some(found) if found + 1 == *end || found == *end => *end,
                    Some(found) => {
                        return Err(TransformError::schema(
                            &raw.name,
                            format!(
                                "expected the data block to end at row {end}, found {} at row {found}",
                                quote_all(sentinels)
                            ),
                        ));
                    }
                    None => *end,
                }
            }
        };

        if self.first_row > end {
            return Err(TransformError::schema(
                &raw.name,
                format!("first data row {} is after the data end {end}", self.first_row),
            ));
        }
        Ok(self.first_row..end)
    }
}

fn find_sentinel(raw: &RawTable, from: usize, sentinels: &[String]) -> Option<usize> {
    if sentinels.is_empty() {
        return None;
    }
    (from..raw.height()).find(|&row| {
        raw.row_label(row)
            .is_some_and(|label| sentinels.iter().any(|s| s == &label))
    })
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn quote_all(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(" or ")
}
