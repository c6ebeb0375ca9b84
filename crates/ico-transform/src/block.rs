//! The labelled wide block of a raw sheet.

use ico_model::RawTable;

use crate::error::{Result, TransformError};
use crate::window::DataWindow;

/// Header-promoted view of a sheet: the entity column, the labelled value
/// columns and the non-blank data rows, all as absolute indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideBlock {
    pub entity_column: usize,
    pub value_columns: Vec<(usize, String)>,
    pub rows: Vec<usize>,
}

impl WideBlock {
    /// Promotes the header row of `window` and keeps the labelled columns.
    ///
    /// Columns whose header cell is blank are dropped; the first remaining
    /// column holds the entity labels.
    pub fn extract(raw: &RawTable, window: &DataWindow) -> Result<Self> {
        let rows = window.resolve(raw)?;

        let mut labelled = (0..raw.width())
            .filter_map(|col| raw.cell(window.header_row, col).label().map(|l| (col, l)));
        let Some((entity_column, _)) = labelled.next() else {
            return Err(TransformError::schema(
                &raw.name,
                format!("header row {} has no labels", window.header_row),
            ));
        };
        let value_columns: Vec<(usize, String)> = labelled.collect();
        if value_columns.is_empty() {
            return Err(TransformError::schema(
                &raw.name,
                format!("header row {} has no value columns", window.header_row),
            ));
        }

        let rows = rows.filter(|&row| !raw.is_blank_row(row)).collect();
        Ok(Self {
            entity_column,
            value_columns,
            rows,
        })
    }

    /// Entity label of every data row, in row order.
    pub fn entity_labels(&self, raw: &RawTable) -> Vec<Option<String>> {
        self.rows
            .iter()
            .map(|&row| raw.cell(row, self.entity_column).label())
            .collect()
    }
}
