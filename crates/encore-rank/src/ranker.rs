//! Match Ranker
//!
//! Per-artist pipeline with ownership-consuming transitions:
//!
//! ```text
//! CollectingMatches --compute_statistics--> StatisticsComputed --rank--> RankedMatches
//! ```
//!
//! Statistics need every scored pair of the artist, so the collection is the
//! barrier between parallel pair scoring and ranking.

use crate::error::{RankError, Result};
use crate::score::MatchScore;
use crate::tier::MatchTier;
use encore_scoring::{PairScore, mean, sample_std, two_sided_p_value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Standard deviations at or below this are treated as zero.
const MIN_STD_DEV: f64 = 1e-9;

/// Score distribution of one artist's scored pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtistStatistics {
    /// Pairs collected
    pub total: usize,
    /// Pairs with a composite score
    pub scored: usize,
    /// Mean composite score, `None` when nothing was scored
    pub mean: Option<f64>,
    /// Sample standard deviation (0 for fewer than two scored pairs)
    pub std_dev: f64,
}

impl ArtistStatistics {
    /// z-score of a composite score; 0 when the deviation is zero.
    pub fn z_score(&self, score: f64) -> f64 {
        match self.mean {
            Some(mean) if self.std_dev > MIN_STD_DEV => (score - mean) / self.std_dev,
            _ => 0.0,
        }
    }
}

/// Collecting state: pair scores for one artist.
#[derive(Debug, Clone)]
pub struct CollectingMatches {
    artist_id: String,
    artist_name: String,
    pairs: Vec<PairScore>,
    brands: BTreeSet<String>,
}

impl CollectingMatches {
    /// Start collecting for an artist.
    pub fn new(artist_id: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            artist_id: artist_id.into(),
            artist_name: artist_name.into(),
            pairs: Vec::new(),
            brands: BTreeSet::new(),
        }
    }

    /// Artist identifier.
    pub fn artist_id(&self) -> &str {
        &self.artist_id
    }

    /// Number of pairs collected.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Add a pair score.
    pub fn push(&mut self, pair: PairScore) -> Result<()> {
        if pair.artist_id != self.artist_id {
            return Err(RankError::ArtistMismatch {
                expected: self.artist_id.clone(),
                found: pair.artist_id,
            });
        }
        if !self.brands.insert(pair.brand_id.clone()) {
            return Err(RankError::DuplicateBrand {
                artist: self.artist_id.clone(),
                brand: pair.brand_id,
            });
        }
        self.pairs.push(pair);
        Ok(())
    }

    /// Compute the artist's score distribution.
    pub fn compute_statistics(self) -> StatisticsComputed {
        let scores: Vec<f64> = self.pairs.iter().filter_map(PairScore::score).collect();
        let statistics = ArtistStatistics {
            total: self.pairs.len(),
            scored: scores.len(),
            mean: mean(&scores),
            std_dev: sample_std(&scores),
        };
        tracing::debug!(
            artist = %self.artist_id,
            scored = statistics.scored,
            total = statistics.total,
            mean = ?statistics.mean,
            std_dev = statistics.std_dev,
            "artist statistics computed"
        );

        StatisticsComputed {
            artist_id: self.artist_id,
            artist_name: self.artist_name,
            statistics,
            pairs: self.pairs,
        }
    }
}

/// Statistics state: distribution known, p-values derivable.
#[derive(Debug, Clone)]
pub struct StatisticsComputed {
    artist_id: String,
    artist_name: String,
    statistics: ArtistStatistics,
    pairs: Vec<PairScore>,
}

impl StatisticsComputed {
    /// Artist identifier.
    pub fn artist_id(&self) -> &str {
        &self.artist_id
    }

    /// Score distribution.
    pub const fn statistics(&self) -> &ArtistStatistics {
        &self.statistics
    }

    /// Sort, rank and tier the matches.
    pub fn rank(self) -> RankedMatches {
        let (mut scored, mut unscored): (Vec<PairScore>, Vec<PairScore>) =
            self.pairs.into_iter().partition(PairScore::is_scored);

        scored.sort_by(|a, b| {
            let a_score = a.score().unwrap_or(f64::NEG_INFINITY);
            let b_score = b.score().unwrap_or(f64::NEG_INFINITY);
            b_score
                .total_cmp(&a_score)
                .then_with(|| a.brand_id.cmp(&b.brand_id))
        });
        unscored.sort_by(|a, b| a.brand_id.cmp(&b.brand_id));

        let statistics = self.statistics;
        let mut matches: Vec<MatchScore> = Vec::with_capacity(scored.len() + unscored.len());
        for (position, pair) in scored.into_iter().enumerate() {
            let z = pair.score().map_or(0.0, |score| statistics.z_score(score));
            matches.push(MatchScore::new(
                pair,
                Some(z),
                Some(two_sided_p_value(z)),
                Some(MatchTier::from_z_score(z)),
                Some(position + 1),
            ));
        }
        matches.extend(
            unscored
                .into_iter()
                .map(|pair| MatchScore::new(pair, None, None, None, None)),
        );

        RankedMatches {
            artist_id: self.artist_id,
            artist_name: self.artist_name,
            statistics,
            matches,
        }
    }
}

/// Ranked state (terminal).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatches {
    artist_id: String,
    artist_name: String,
    statistics: ArtistStatistics,
    matches: Vec<MatchScore>,
}

impl RankedMatches {
    /// Artist identifier.
    pub fn artist_id(&self) -> &str {
        &self.artist_id
    }

    /// Artist display name.
    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    /// Score distribution.
    pub const fn statistics(&self) -> &ArtistStatistics {
        &self.statistics
    }

    /// All matches: ranked first, then unscored.
    pub fn matches(&self) -> &[MatchScore] {
        &self.matches
    }

    /// Best `n` scored matches.
    pub fn top(&self, n: usize) -> impl Iterator<Item = &MatchScore> {
        self.matches
            .iter()
            .filter(|score| score.is_scored())
            .take(n)
    }

    /// Highest-ranked match, if any pair was scored.
    pub fn best(&self) -> Option<&MatchScore> {
        self.matches.first().filter(|score| score.is_scored())
    }

    /// Consume into the match list.
    pub fn into_matches(self) -> Vec<MatchScore> {
        self.matches
    }
}

/// Group pair scores by artist, then compute statistics and rank each group.
///
/// Groups are returned ordered by artist name, then artist id.
pub fn rank_by_artist(pairs: Vec<PairScore>) -> Result<Vec<RankedMatches>> {
    let mut groups: BTreeMap<String, CollectingMatches> = BTreeMap::new();
    for pair in pairs {
        groups
            .entry(pair.artist_id.clone())
            .or_insert_with(|| CollectingMatches::new(pair.artist_id.clone(), pair.artist_name.clone()))
            .push(pair)?;
    }

    let mut ranked: Vec<RankedMatches> = groups
        .into_values()
        .map(|collecting| collecting.compute_statistics().rank())
        .collect();
    ranked.sort_by(|a, b| {
        a.artist_name
            .cmp(&b.artist_name)
            .then_with(|| a.artist_id.cmp(&b.artist_id))
    });
    Ok(ranked)
}
