//! Ranking errors.

use thiserror::Error;

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors raised while collecting pair scores for an artist.
#[derive(Debug, Error)]
pub enum RankError {
    /// A pair score for another artist was pushed
    #[error("Pair for artist {found} pushed to the collection for {expected}")]
    ArtistMismatch {
        /// Artist the collection belongs to
        expected: String,
        /// Artist of the rejected pair
        found: String,
    },

    /// The same brand was scored twice for one artist
    #[error("Duplicate pair {artist} x {brand}")]
    DuplicateBrand {
        /// Artist identifier
        artist: String,
        /// Brand identifier
        brand: String,
    },
}
