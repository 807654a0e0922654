#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/encore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ranker;
pub mod score;
pub mod tier;

pub use error::{RankError, Result};
pub use ranker::{
    ArtistStatistics, CollectingMatches, RankedMatches, StatisticsComputed, rank_by_artist,
};
pub use score::MatchScore;
pub use tier::MatchTier;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
