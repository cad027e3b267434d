use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::source::SourceError;
use crate::core::models::point_set::PointSetError;

/// Failures of a single superposition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Numeric failure: {0}")]
    NumericFailure(String),
}

impl From<PointSetError> for AlignError {
    fn from(e: PointSetError) -> Self {
        AlignError::InvalidInput(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Structure lookup failed: {source}")]
    Source {
        #[from]
        source: SourceError,
    },

    #[error("Alignment failed: {source}")]
    Alignment {
        #[from]
        source: AlignError,
    },

    #[error("Alignment of '{first}' against '{second}' failed: {source}")]
    PairFailed {
        first: String,
        second: String,
        #[source]
        source: AlignError,
    },

    #[error("Molecule '{molecule_id}' has no stored geometries")]
    NoGeometries { molecule_id: String },

    #[error("Failed to write RMSD matrix: {0}")]
    Output(#[from] csv::Error),
}
