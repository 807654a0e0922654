//! Final, immutable match result for one (artist, brand) pair.

use crate::tier::MatchTier;
use encore_data::IndustryCategory;
use encore_scoring::{ComponentScores, CompositeScore, PairScore};

/// Ranked match of one artist with one brand.
///
/// Built once by [`crate::StatisticsComputed::rank`]; fields are read-only.
/// Score-derived fields are `None` for pairs that could not be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pair: PairScore,
    z_score: Option<f64>,
    p_value: Option<f64>,
    tier: Option<MatchTier>,
    rank: Option<usize>,
}

impl MatchScore {
    pub(crate) const fn new(
        pair: PairScore,
        z_score: Option<f64>,
        p_value: Option<f64>,
        tier: Option<MatchTier>,
        rank: Option<usize>,
    ) -> Self {
        Self {
            pair,
            z_score,
            p_value,
            tier,
            rank,
        }
    }

    /// Artist identifier.
    pub fn artist_id(&self) -> &str {
        &self.pair.artist_id
    }

    /// Artist display name.
    pub fn artist_name(&self) -> &str {
        &self.pair.artist_name
    }

    /// Brand identifier.
    pub fn brand_id(&self) -> &str {
        &self.pair.brand_id
    }

    /// Brand display name.
    pub fn brand_name(&self) -> &str {
        &self.pair.brand_name
    }

    /// Brand industry.
    pub const fn industry(&self) -> IndustryCategory {
        self.pair.industry
    }

    /// Whether the pair was scored.
    pub const fn is_scored(&self) -> bool {
        self.pair.is_scored()
    }

    /// Composite score (0-100).
    pub fn composite_score(&self) -> Option<f64> {
        self.pair.score()
    }

    /// Composite score with interval.
    pub const fn composite(&self) -> Option<&CompositeScore> {
        self.pair.composite.as_ref()
    }

    /// Component scores (0-1).
    pub const fn components(&self) -> Option<&ComponentScores> {
        self.pair.components.as_ref()
    }

    /// Artist-relative z-score.
    pub const fn z_score(&self) -> Option<f64> {
        self.z_score
    }

    /// Two-sided p-value against the artist's mean score.
    pub const fn p_value(&self) -> Option<f64> {
        self.p_value
    }

    /// Artist-relative tier.
    pub const fn tier(&self) -> Option<MatchTier> {
        self.tier
    }

    /// 1-based rank within the artist's scored matches.
    pub const fn rank(&self) -> Option<usize> {
        self.rank
    }
}
