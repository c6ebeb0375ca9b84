//! Untyped spreadsheet blocks as read from disk.

use crate::numeric::{format_numeric, parse_f64};

/// A single spreadsheet cell before any interpretation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawCell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Renders the cell as a trimmed label, or `None` when blank.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Number(value) => Some(format_numeric(*value)),
        }
    }

    /// Interprets the cell as a number; anything non-numeric becomes `None`.
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Text(value) => parse_f64(value),
            Self::Number(value) => value.is_finite().then_some(*value),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A row-major block of cells; row `i` is sheet row `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub name: String,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at `(row, col)`, treating ragged rows as padded with empties.
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Label of the first cell in a row.
    pub fn row_label(&self, row: usize) -> Option<String> {
        self.cell(row, 0).label()
    }

    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(RawCell::is_blank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_header_renders_as_year() {
        assert_eq!(RawCell::Number(1990.0).label().as_deref(), Some("1990"));
        assert_eq!(RawCell::text("  Angola ").label().as_deref(), Some("Angola"));
        assert_eq!(RawCell::text("   ").label(), None);
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let table = RawTable::new(
            "t",
            vec![vec![RawCell::from("a")], vec![RawCell::from("b"), 2.0.into()]],
        );
        assert_eq!(table.width(), 2);
        assert_eq!(table.cell(0, 1), &RawCell::Empty);
        assert_eq!(table.cell(5, 5), &RawCell::Empty);
        assert!(table.is_blank_row(7));
        assert!(!table.is_blank_row(1));
    }
}
