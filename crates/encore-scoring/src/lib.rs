#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/encore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod attributes;
pub mod component;
pub mod composite;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pair;
pub mod stats;

pub use attributes::{IndustryAttributeMap, IndustryLink, KeywordLexicon};
pub use component::{ComponentScorer, ComponentScores, GeographyConfig, cosine_similarity};
pub use composite::{ComponentVariance, CompositeScore, CompositeScorer, Weights};
pub use config::ScoringConfig;
pub use error::{Result, ScoringError};
pub use normalize::{
    DemographicVectors, NormalizedArtist, NormalizedBrand, Normalizer, WeightedAttribute,
    normalize_demographics, rebin,
};
pub use pair::{MatchScorer, PairScore};
pub use stats::{mean, normal_cdf, pearson, sample_std, two_sided_p_value};

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
