//! Error types for the normalization engine.

use thiserror::Error;

use ico_model::{ModelError, SourceKind};

/// Errors raised while normalizing or harmonizing tables.
///
/// Numeric parse failures and join misses are not errors; they surface as
/// null values in the output.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An input lacks an expected row range, label or column.
    #[error("schema mismatch in {table}: {reason}")]
    SchemaMismatch { table: String, reason: String },

    /// The disaggregation ratio has no overlap window to learn from.
    #[error("cannot derive split ratio for '{merged}': {reason}")]
    SplitRatioUnavailable { merged: String, reason: String },

    /// A required source table was not supplied.
    #[error("missing required source: {0}")]
    MissingSource(SourceKind),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
}

impl TransformError {
    pub(crate) fn schema(table: &str, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_display() {
        let err = TransformError::schema("imports", "no 'Total' row after row 4");
        assert_eq!(
            err.to_string(),
            "schema mismatch in imports: no 'Total' row after row 4"
        );
    }

    #[test]
    fn test_missing_source_display() {
        let err = TransformError::MissingSource(SourceKind::GrossOpeningStocks);
        assert_eq!(err.to_string(), "missing required source: gross_opening_stocks");
    }
}
