//! Error types for normalization and scoring.

use encore_data::{Axis, DataError};
use thiserror::Error;

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors raised while normalizing profiles or scoring pairs.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A label does not belong to the fixed enumeration for its axis
    #[error("Schema mismatch in {profile}: unknown {axis} label '{label}'")]
    SchemaMismatch {
        /// Identifier of the offending profile
        profile: String,
        /// Axis the label was found on
        axis: Axis,
        /// The unrecognised label
        label: String,
    },

    /// Two labels on one axis resolve to the same bucket
    #[error("Duplicate {axis} bucket '{bucket}' in {profile}")]
    DuplicateBucket {
        /// Identifier of the offending profile
        profile: String,
        /// Axis the bucket belongs to
        axis: Axis,
        /// Canonical bucket label
        bucket: String,
    },

    /// A bucket value is not usable (non-finite, or a negative share)
    #[error("Invalid {axis} value {value} for '{label}' in {profile}")]
    InvalidValue {
        /// Identifier of the offending profile
        profile: String,
        /// Axis the value was found on
        axis: Axis,
        /// Label carrying the value
        label: String,
        /// The rejected value
        value: f64,
    },

    /// No demographic axis is available on both sides of a pair
    #[error("Insufficient data to score {artist} x {brand}: no shared demographic axis")]
    InsufficientData {
        /// Artist identifier
        artist: String,
        /// Brand identifier
        brand: String,
    },

    /// The weight vector is invalid; fatal for a run
    #[error("Weight configuration error: {0}")]
    WeightConfiguration(String),

    /// Any other invalid configuration parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the data layer (e.g. unparseable audience text)
    #[error(transparent)]
    Data(#[from] DataError),
}
