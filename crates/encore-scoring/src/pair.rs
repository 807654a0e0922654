//! Pair scoring: components plus composite for one (artist, brand) pair.

use crate::attributes::IndustryAttributeMap;
use crate::component::{ComponentScorer, ComponentScores};
use crate::composite::{CompositeScore, CompositeScorer};
use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::normalize::{NormalizedArtist, NormalizedBrand};
use encore_data::IndustryCategory;

/// Score of one pair before ranking.
///
/// `components` and `composite` are `None` when the pair has no shared
/// demographic axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    /// Artist identifier
    pub artist_id: String,
    /// Artist display name
    pub artist_name: String,
    /// Brand identifier
    pub brand_id: String,
    /// Brand display name
    pub brand_name: String,
    /// Brand industry
    pub industry: IndustryCategory,
    /// Component scores
    pub components: Option<ComponentScores>,
    /// Composite score
    pub composite: Option<CompositeScore>,
}

impl PairScore {
    /// Whether a composite score was computed.
    pub const fn is_scored(&self) -> bool {
        self.composite.is_some()
    }

    /// Composite score, if computed.
    pub fn score(&self) -> Option<f64> {
        self.composite.map(|composite| composite.score)
    }
}

/// Scores normalized pairs end to end.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    components: ComponentScorer,
    composite: CompositeScorer,
}

impl MatchScorer {
    /// Build from configuration and an industry attribute map.
    pub fn from_config(config: &ScoringConfig, industry_map: IndustryAttributeMap) -> Result<Self> {
        Ok(Self {
            components: ComponentScorer::new(industry_map, config.geography),
            composite: CompositeScorer::from_config(config)?,
        })
    }

    /// Composite scorer in use.
    pub const fn composite_scorer(&self) -> &CompositeScorer {
        &self.composite
    }

    /// Score one pair.
    ///
    /// Insufficient demographic data yields an unscored [`PairScore`] rather
    /// than an error.
    pub fn score_pair(&self, artist: &NormalizedArtist, brand: &NormalizedBrand) -> Result<PairScore> {
        let components = match self.components.score(artist, brand) {
            Ok(components) => Some(components),
            Err(ScoringError::InsufficientData {
                artist: artist_id,
                brand: brand_id,
            }) => {
                tracing::debug!(artist = %artist_id, brand = %brand_id, "no shared demographic axis, pair left unscored");
                None
            }
            Err(err) => return Err(err),
        };
        let composite = components
            .as_ref()
            .map(|components| self.composite.score(components));

        Ok(PairScore {
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            brand_id: brand.id.clone(),
            brand_name: brand.name.clone(),
            industry: brand.industry,
            components,
            composite,
        })
    }
}
