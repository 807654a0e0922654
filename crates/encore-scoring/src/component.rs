//! Component Scorer
//!
//! Pure sub-scores for one normalized (artist, brand) pair, each in `[0, 1]`:
//!
//! - demographic: cosine similarity of the concatenated affinity vectors over
//!   the axes both sides carry, mapped as `(1 + cos) / 2`
//! - attribute: share of the artist's top-attribute relevance found in the
//!   brand's attribute set
//! - geographic: 1 on market overlap, otherwise a distance-decayed partial
//! - industry affinity: summed correlation of the artist's attributes with the
//!   brand's industry, capped at 1

use crate::attributes::IndustryAttributeMap;
use crate::error::{Result, ScoringError};
use crate::normalize::{DemographicVectors, NormalizedArtist, NormalizedBrand, WeightedAttribute};
use encore_data::{Axis, IndustryCategory, Market};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Partial geographic credit for markets that do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographyConfig {
    /// Score at zero distance without overlap
    pub max_partial: f64,
    /// Distance (km) over which the partial score decays by a factor of e
    pub decay_km: f64,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            max_partial: 0.5,
            decay_km: 800.0,
        }
    }
}

impl GeographyConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_partial) {
            return Err(ScoringError::InvalidParameter(format!(
                "geography.max_partial must be in [0, 1], got {}",
                self.max_partial
            )));
        }
        if !self.decay_km.is_finite() || self.decay_km <= 0.0 {
            return Err(ScoringError::InvalidParameter(format!(
                "geography.decay_km must be positive, got {}",
                self.decay_km
            )));
        }
        Ok(())
    }
}

/// Sub-scores of one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Demographic similarity over the shared axes
    pub demographic: f64,
    /// Age similarity, if both sides carry age
    pub age: Option<f64>,
    /// Gender similarity, if both sides carry gender
    pub gender: Option<f64>,
    /// Income similarity, if both sides carry income
    pub income: Option<f64>,
    /// Ethnicity similarity, if both sides carry ethnicity
    pub ethnicity: Option<f64>,
    /// Consumer-attribute score
    pub attribute: f64,
    /// Number of top attributes found in the brand's attribute set
    pub attribute_matches: usize,
    /// Geographic score
    pub geographic: f64,
    /// Industry-affinity bonus
    pub industry_affinity: f64,
}

/// Cosine similarity mapped to `[0, 1]` as `(1 + cos) / 2`.
///
/// A zero-norm vector yields the neutral 0.5. `None` when the lengths differ.
pub fn cosine_similarity(a: &Array1<f64>, b: &Array1<f64>) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.5);
    }
    let cos = (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Some((1.0 + cos) / 2.0)
}

/// Computes component scores for normalized pairs.
#[derive(Debug, Clone, Default)]
pub struct ComponentScorer {
    industry_map: IndustryAttributeMap,
    geography: GeographyConfig,
}

impl ComponentScorer {
    /// Create a scorer.
    pub const fn new(industry_map: IndustryAttributeMap, geography: GeographyConfig) -> Self {
        Self {
            industry_map,
            geography,
        }
    }

    /// Industry attribute map in use.
    pub const fn industry_map(&self) -> &IndustryAttributeMap {
        &self.industry_map
    }

    /// Score one pair.
    ///
    /// Fails with [`ScoringError::InsufficientData`] when no demographic axis
    /// is present on both sides.
    pub fn score(&self, artist: &NormalizedArtist, brand: &NormalizedBrand) -> Result<ComponentScores> {
        let axis_score = |axis: Axis| {
            let a = artist.demographics.axis(axis)?;
            let b = brand.demographics.axis(axis)?;
            cosine_similarity(a, b)
        };

        let demographic = demographic_score(&artist.demographics, &brand.demographics).ok_or_else(
            || ScoringError::InsufficientData {
                artist: artist.id.clone(),
                brand: brand.id.clone(),
            },
        )?;
        let (attribute, attribute_matches) = attribute_score(&artist.top_attributes, &brand.attributes);

        Ok(ComponentScores {
            demographic,
            age: axis_score(Axis::Age),
            gender: axis_score(Axis::Gender),
            income: axis_score(Axis::Income),
            ethnicity: axis_score(Axis::Ethnicity),
            attribute,
            attribute_matches,
            geographic: geographic_score(&artist.markets, &brand.markets, &self.geography),
            industry_affinity: industry_affinity(
                &artist.top_attributes,
                brand.industry,
                &self.industry_map,
            ),
        })
    }
}

/// Similarity of the concatenated vectors over the axes both sides carry.
pub fn demographic_score(artist: &DemographicVectors, brand: &DemographicVectors) -> Option<f64> {
    let mut a = Vec::new();
    let mut b = Vec::new();
    for axis in DemographicVectors::AXES {
        if let (Some(x), Some(y)) = (artist.axis(axis), brand.axis(axis)) {
            a.extend(x.iter().copied());
            b.extend(y.iter().copied());
        }
    }
    if a.is_empty() {
        return None;
    }
    cosine_similarity(&Array1::from_vec(a), &Array1::from_vec(b))
}

/// Matched relevance mass over total mass, plus the match count.
pub fn attribute_score(top: &[WeightedAttribute], brand: &BTreeSet<String>) -> (f64, usize) {
    let total: f64 = top.iter().map(|attribute| attribute.relevance).sum();
    let (matched, count) = top
        .iter()
        .filter(|attribute| brand.contains(&attribute.name))
        .fold((0.0, 0), |(mass, count), attribute| {
            (mass + attribute.relevance, count + 1)
        });
    if total <= 0.0 {
        return (0.0, count);
    }
    ((matched / total).clamp(0.0, 1.0), count)
}

/// Geographic proximity of two market lists.
pub fn geographic_score(artist: &[Market], brand: &[Market], config: &GeographyConfig) -> f64 {
    if artist.is_empty() || brand.is_empty() {
        return 0.0;
    }
    let mut nearest = f64::INFINITY;
    for a in artist {
        for b in brand {
            if a.overlaps(b) {
                return 1.0;
            }
            nearest = nearest.min(a.distance_km(b));
        }
    }
    config.max_partial * (-nearest / config.decay_km).exp()
}

/// Summed attribute-to-industry correlation, capped at 1.
pub fn industry_affinity(
    top: &[WeightedAttribute],
    industry: IndustryCategory,
    map: &IndustryAttributeMap,
) -> f64 {
    top.iter()
        .filter_map(|attribute| map.strength(&attribute.name, industry))
        .sum::<f64>()
        .min(1.0)
}
