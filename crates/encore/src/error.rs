//! Error types for the match engine.

use encore_data::DataError;
use encore_output::ExportError;
use encore_rank::RankError;
use encore_scoring::ScoringError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort a match run.
///
/// Per-profile problems do not appear here; they are collected as
/// [`crate::Rejection`]s and the run continues.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Scoring or configuration error
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// Loading profiles failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Ranking error
    #[error(transparent)]
    Rank(#[from] RankError),

    /// Writing outputs failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
