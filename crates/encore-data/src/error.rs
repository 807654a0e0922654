//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or parsing profile records.
#[derive(Debug, Error)]
pub enum DataError {
    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Audience text could not be parsed for a profile
    #[error("Invalid audience text for {profile}: {reason}")]
    AudienceText {
        /// Identifier of the profile carrying the text
        profile: String,
        /// What went wrong
        reason: String,
    },

    /// A required field is missing from a record
    #[error("Missing data for {profile}: {reason}")]
    MissingData {
        /// Identifier of the record
        profile: String,
        /// Reason for missing data
        reason: String,
    },

    /// Two records of the same kind share an identifier
    #[error("Duplicate {kind} identifier: {profile}")]
    DuplicateId {
        /// Record kind ("artist" or "brand")
        kind: String,
        /// The repeated identifier
        profile: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
