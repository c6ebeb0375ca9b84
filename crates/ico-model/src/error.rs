use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("crosswalk is not idempotent: '{source_name}' maps to '{target}', which is remapped to '{remapped}'")]
    CrosswalkNotIdempotent {
        source_name: String,
        target: String,
        remapped: String,
    },
    #[error("crosswalk maps '{source_name}' to both '{first}' and '{second}'")]
    CrosswalkConflict {
        source_name: String,
        first: String,
        second: String,
    },
    #[error("unknown source key: {0}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
