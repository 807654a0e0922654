//! Profile Normalizer
//!
//! Converts artist and brand profiles from their native bucket schemes into
//! fixed-length affinity vectors over the canonical enumerations:
//!
//! - gender: `fraction - 1/3` over [Female, Male, Non-Binary]
//! - age: signed deviations over the six canonical (brand-native) buckets
//! - income: signed deviations over the five canonical buckets
//! - ethnicity: signed deviations over the five ethnicity buckets; a breakdown
//!   missing any bucket counts as missing
//!
//! Age and income are re-binned by range overlap. A canonical bucket's value is
//! the overlap-width-weighted mean of the source buckets covering it; a bucket
//! no source covers sits at the population average.

use crate::attributes::{KeywordLexicon, normalize_name};
use crate::error::{Result, ScoringError};
use encore_data::{
    AgeBucket, ArtistProfile, Axis, BrandProfile, BucketRange, ConsumerAttribute, Demographics,
    Ethnicity, Gender, IncomeBucket, IndustryCategory, Market,
};
use ndarray::Array1;
use std::collections::{BTreeMap, BTreeSet};

/// Normalized demographic vectors; `None` marks a missing axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemographicVectors {
    /// Gender fractions, summing to 1
    pub gender_split: Option<Array1<f64>>,
    /// Gender affinity (`fraction - 1/3`)
    pub gender: Option<Array1<f64>>,
    /// Age deviations over [`AgeBucket::CANONICAL`]
    pub age: Option<Array1<f64>>,
    /// Income deviations over [`IncomeBucket::CANONICAL`]
    pub income: Option<Array1<f64>>,
    /// Ethnicity deviations over [`Ethnicity::ALL`]
    pub ethnicity: Option<Array1<f64>>,
}

impl DemographicVectors {
    /// Demographic axes in concatenation order.
    pub const AXES: [Axis; 4] = [Axis::Age, Axis::Gender, Axis::Income, Axis::Ethnicity];

    /// Affinity vector for one axis.
    pub fn axis(&self, axis: Axis) -> Option<&Array1<f64>> {
        match axis {
            Axis::Gender => self.gender.as_ref(),
            Axis::Age => self.age.as_ref(),
            Axis::Income => self.income.as_ref(),
            Axis::Ethnicity => self.ethnicity.as_ref(),
            Axis::Industry | Axis::Market => None,
        }
    }

    /// Axes with data.
    pub fn present_axes(&self) -> Vec<Axis> {
        Self::AXES
            .into_iter()
            .filter(|axis| self.axis(*axis).is_some())
            .collect()
    }

    /// Whether every demographic axis is missing.
    pub fn is_empty(&self) -> bool {
        self.present_axes().is_empty()
    }
}

/// A consumer attribute after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedAttribute {
    /// Lowercased, trimmed name
    pub name: String,
    /// Non-negative relevance
    pub relevance: f64,
}

/// Artist profile in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedArtist {
    /// Artist identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Demographic vectors
    pub demographics: DemographicVectors,
    /// Top consumer attributes, highest relevance first
    pub top_attributes: Vec<WeightedAttribute>,
    /// Resolved tour markets, sorted and deduplicated
    pub markets: Vec<Market>,
}

/// Brand profile in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBrand {
    /// Brand identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Resolved industry
    pub industry: IndustryCategory,
    /// Demographic vectors
    pub demographics: DemographicVectors,
    /// Own attributes plus keyword matches from the audience description
    pub attributes: BTreeSet<String>,
    /// Resolved markets, sorted and deduplicated
    pub markets: Vec<Market>,
}

/// Re-bin `(range, value)` pairs onto `targets` by overlap-weighted mean.
///
/// Targets with no overlapping source get 0 (the population average).
pub fn rebin(source: &[(BucketRange, f64)], targets: &[BucketRange]) -> Array1<f64> {
    targets
        .iter()
        .map(|target| {
            let (weighted, covered) = source
                .iter()
                .fold((0.0, 0.0), |(weighted, covered), (range, value)| {
                    let overlap = range.overlap(target);
                    (weighted + overlap * value, covered + overlap)
                });
            if covered > 0.0 { weighted / covered } else { 0.0 }
        })
        .collect()
}

/// Normalizes profiles for scoring.
#[derive(Debug, Clone)]
pub struct Normalizer {
    top_attributes: usize,
    lexicon: KeywordLexicon,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(10, KeywordLexicon::default())
    }
}

impl Normalizer {
    /// Create a normalizer keeping `top_attributes` artist attributes.
    pub fn new(top_attributes: usize, lexicon: KeywordLexicon) -> Self {
        Self {
            top_attributes,
            lexicon,
        }
    }

    /// Normalize an artist profile.
    ///
    /// Audience text is parsed when structured demographics are absent.
    pub fn normalize_artist(&self, artist: &ArtistProfile) -> Result<NormalizedArtist> {
        let (demographics, attributes) = artist.resolved_audience()?;
        let demographics = normalize_demographics(&artist.id, &demographics)?;
        if demographics.is_empty() {
            tracing::debug!(artist = %artist.id, "artist has no demographic data");
        }

        Ok(NormalizedArtist {
            id: artist.id.clone(),
            name: artist.name.clone(),
            demographics,
            top_attributes: self.top_attributes(&attributes),
            markets: resolve_markets(&artist.id, &artist.markets)?,
        })
    }

    /// Normalize a brand profile.
    pub fn normalize_brand(&self, brand: &BrandProfile) -> Result<NormalizedBrand> {
        let industry =
            IndustryCategory::parse(&brand.industry).ok_or_else(|| ScoringError::SchemaMismatch {
                profile: brand.id.clone(),
                axis: Axis::Industry,
                label: brand.industry.clone(),
            })?;

        let demographics = match &brand.demographics {
            Some(demographics) => normalize_demographics(&brand.id, demographics)?,
            None => DemographicVectors::default(),
        };
        if demographics.is_empty() {
            tracing::debug!(brand = %brand.id, "brand has no demographic data");
        }

        let mut attributes: BTreeSet<String> = brand
            .attributes
            .iter()
            .map(|attribute| normalize_name(&attribute.name))
            .filter(|name| !name.is_empty())
            .collect();
        if let Some(description) = &brand.audience_description {
            attributes.extend(self.lexicon.extract(description));
        }

        Ok(NormalizedBrand {
            id: brand.id.clone(),
            name: brand.name.clone(),
            industry,
            demographics,
            attributes,
            markets: resolve_markets(&brand.id, &brand.markets)?,
        })
    }

    /// Clean attributes and keep the top N by relevance (ties by name).
    ///
    /// Negative relevance is clamped to 0, duplicate names keep their highest
    /// relevance and zero-relevance attributes are dropped.
    pub fn top_attributes(&self, attributes: &[ConsumerAttribute]) -> Vec<WeightedAttribute> {
        let mut merged: BTreeMap<String, f64> = BTreeMap::new();
        for attribute in attributes {
            let name = normalize_name(&attribute.name);
            let relevance = if attribute.relevance.is_finite() {
                attribute.relevance.max(0.0)
            } else {
                0.0
            };
            if name.is_empty() || relevance == 0.0 {
                continue;
            }
            let entry = merged.entry(name).or_insert(0.0);
            *entry = entry.max(relevance);
        }

        let mut ranked: Vec<WeightedAttribute> = merged
            .into_iter()
            .map(|(name, relevance)| WeightedAttribute { name, relevance })
            .collect();
        ranked.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(self.top_attributes);
        ranked
    }
}

/// Normalize every axis of a demographics record.
pub fn normalize_demographics(profile: &str, demographics: &Demographics) -> Result<DemographicVectors> {
    let convention = demographics.index_convention;
    let (gender_split, gender) = match normalize_gender(profile, &demographics.gender)? {
        Some(split) => {
            let affinity = split.mapv(|fraction| fraction - 1.0 / 3.0);
            (Some(split), Some(affinity))
        }
        None => (None, None),
    };

    let age = resolve_axis(profile, Axis::Age, &demographics.age, AgeBucket::parse)?;
    let age = (!age.is_empty()).then(|| {
        let source: Vec<(BucketRange, f64)> = age
            .iter()
            .map(|(bucket, value)| (bucket.range(), convention.deviation(*value)))
            .collect();
        let targets: Vec<BucketRange> = AgeBucket::CANONICAL.iter().map(AgeBucket::range).collect();
        rebin(&source, &targets)
    });

    let income = resolve_axis(profile, Axis::Income, &demographics.income, IncomeBucket::parse)?;
    let income = (!income.is_empty()).then(|| {
        let source: Vec<(BucketRange, f64)> = income
            .iter()
            .map(|(bucket, value)| (bucket.range(), convention.deviation(*value)))
            .collect();
        let targets: Vec<BucketRange> = IncomeBucket::CANONICAL
            .iter()
            .map(IncomeBucket::range)
            .collect();
        rebin(&source, &targets)
    });

    let ethnicity = resolve_axis(profile, Axis::Ethnicity, &demographics.ethnicity, Ethnicity::parse)?;
    // Single scheme, so there is nothing to re-bin a gap from.
    let ethnicity = if ethnicity.len() == Ethnicity::ALL.len() {
        Some(
            Ethnicity::ALL
                .iter()
                .filter_map(|bucket| ethnicity.get(bucket))
                .map(|value| convention.deviation(*value))
                .collect::<Array1<f64>>(),
        )
    } else {
        if !ethnicity.is_empty() {
            tracing::debug!(
                profile = %profile,
                present = ethnicity.len(),
                "partial ethnicity breakdown treated as missing"
            );
        }
        None
    };

    Ok(DemographicVectors {
        gender_split,
        gender,
        age,
        income,
        ethnicity,
    })
}

/// Gender fractions rescaled to sum to 1. An all-zero split is missing.
fn normalize_gender(profile: &str, raw: &BTreeMap<String, f64>) -> Result<Option<Array1<f64>>> {
    let resolved = resolve_axis(profile, Axis::Gender, raw, Gender::parse)?;
    for (label, value) in raw {
        if *value < 0.0 {
            return Err(ScoringError::InvalidValue {
                profile: profile.to_string(),
                axis: Axis::Gender,
                label: label.clone(),
                value: *value,
            });
        }
    }

    let total: f64 = resolved.values().sum();
    if total <= 0.0 {
        return Ok(None);
    }
    Ok(Some(
        Gender::ALL
            .iter()
            .map(|gender| resolved.get(gender).copied().unwrap_or(0.0) / total)
            .collect(),
    ))
}

/// Resolve raw labels on one axis into buckets, rejecting unknown labels,
/// duplicates and non-finite values.
fn resolve_axis<B: Ord + Copy + std::fmt::Display>(
    profile: &str,
    axis: Axis,
    raw: &BTreeMap<String, f64>,
    parse: impl Fn(&str) -> Option<B>,
) -> Result<BTreeMap<B, f64>> {
    let mut resolved = BTreeMap::new();
    for (label, value) in raw {
        let bucket = parse(label).ok_or_else(|| ScoringError::SchemaMismatch {
            profile: profile.to_string(),
            axis,
            label: label.clone(),
        })?;
        if !value.is_finite() {
            return Err(ScoringError::InvalidValue {
                profile: profile.to_string(),
                axis,
                label: label.clone(),
                value: *value,
            });
        }
        if resolved.insert(bucket, *value).is_some() {
            return Err(ScoringError::DuplicateBucket {
                profile: profile.to_string(),
                axis,
                bucket: bucket.to_string(),
            });
        }
    }
    Ok(resolved)
}

fn resolve_markets(profile: &str, raw: &[String]) -> Result<Vec<Market>> {
    let markets: BTreeSet<Market> = raw
        .iter()
        .map(|label| {
            Market::parse(label).ok_or_else(|| ScoringError::SchemaMismatch {
                profile: profile.to_string(),
                axis: Axis::Market,
                label: label.clone(),
            })
        })
        .collect::<Result<_>>()?;
    Ok(markets.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use encore_data::IndexConvention;

    fn demographics(gender: &[(&str, f64)], age: &[(&str, f64)]) -> Demographics {
        Demographics {
            gender: gender.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            age: age.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_gender_sums_to_one() {
        let vectors =
            normalize_demographics("a1", &demographics(&[("Female", 55.0), ("Male", 40.0)], &[]))
                .unwrap();
        let split = vectors.gender_split.unwrap();
        assert_relative_eq!(split.sum(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(split[0], 55.0 / 95.0, epsilon = 1e-12);
        assert_relative_eq!(split[2], 0.0);

        let affinity = vectors.gender.unwrap();
        assert_relative_eq!(affinity.sum(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_gender_is_missing() {
        let vectors =
            normalize_demographics("a1", &demographics(&[("Female", 0.0), ("Male", 0.0)], &[]))
                .unwrap();
        assert!(vectors.gender.is_none());
        assert!(vectors.is_empty());
    }

    #[test]
    fn test_negative_gender_share_rejected() {
        let err = normalize_demographics("a1", &demographics(&[("Female", -0.2)], &[])).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidValue { axis: Axis::Gender, .. }));
    }

    #[test]
    fn test_rebin_overlap_weighted_mean() {
        // 21-29 at +0.3 and 30-39 at -0.1 onto 25-34: 5 years of each.
        let source = [
            (AgeBucket::From21To29.range(), 0.3),
            (AgeBucket::From30To39.range(), -0.1),
        ];
        let targets = [
            AgeBucket::From18To24.range(),
            AgeBucket::From25To34.range(),
            AgeBucket::From55To64.range(),
        ];
        let rebinned = rebin(&source, &targets);
        assert_relative_eq!(rebinned[0], 0.3);
        assert_relative_eq!(rebinned[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(rebinned[2], 0.0);
    }

    #[test]
    fn test_canonical_age_passes_through() {
        let vectors = normalize_demographics(
            "b1",
            &demographics(&[], &[("18-24", 150.0), ("25-34", 120.0), ("65+", 60.0)]),
        )
        .unwrap();
        let age = vectors.age.unwrap();
        assert_eq!(age.len(), AgeBucket::CANONICAL.len());
        assert_relative_eq!(age[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(age[1], 0.2, epsilon = 1e-12);
        assert_relative_eq!(age[2], 0.0);
        assert_relative_eq!(age[5], -0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_signed_convention() {
        let mut signed = demographics(&[], &[("18-24", 0.5)]);
        signed.index_convention = IndexConvention::Signed;
        let base = demographics(&[], &[("18-24", 150.0)]);

        let a = normalize_demographics("a", &signed).unwrap();
        let b = normalize_demographics("b", &base).unwrap();
        assert_eq!(a.age, b.age);
    }

    #[test]
    fn test_full_ethnicity_in_fixed_order() {
        let mut demo = demographics(&[], &[]);
        for (label, value) in [
            ("Other", 95.0),
            ("White", 90.0),
            ("Asian", 100.0),
            ("Hispanic", 120.0),
            ("African American", 115.0),
        ] {
            demo.ethnicity.insert(label.to_string(), value);
        }
        let ethnicity = normalize_demographics("b1", &demo).unwrap().ethnicity.unwrap();
        let expected: Vec<f64> = Ethnicity::ALL
            .iter()
            .map(|bucket| (demo.ethnicity[bucket.label()] - 100.0) / 100.0)
            .collect();
        assert_eq!(ethnicity.len(), 5);
        for (actual, expected) in ethnicity.iter().zip(expected) {
            assert_relative_eq!(*actual, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_partial_ethnicity_is_missing() {
        let mut demo = demographics(&[("Female", 0.5), ("Male", 0.5)], &[]);
        for (label, value) in [
            ("White", 90.0),
            ("Hispanic", 120.0),
            ("African American", 115.0),
            ("Asian", 100.0),
        ] {
            demo.ethnicity.insert(label.to_string(), value);
        }
        let vectors = normalize_demographics("b1", &demo).unwrap();
        assert!(vectors.ethnicity.is_none());
        assert!(vectors.gender.is_some());
    }

    #[test]
    fn test_unknown_label_is_schema_mismatch() {
        let err = normalize_demographics("a9", &demographics(&[], &[("22-27", 110.0)])).unwrap_err();
        match err {
            ScoringError::SchemaMismatch {
                profile,
                axis,
                label,
            } => {
                assert_eq!(profile, "a9");
                assert_eq!(axis, Axis::Age);
                assert_eq!(label, "22-27");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_bucket_rejected() {
        let err = normalize_demographics(
            "a1",
            &demographics(&[], &[("21-29", 110.0), ("21-29 Years Old", 120.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::DuplicateBucket { axis: Axis::Age, .. }));
    }

    #[test]
    fn test_top_attributes() {
        let normalizer = Normalizer::new(2, KeywordLexicon::default());
        let attributes = [
            ConsumerAttribute::new(" Dog Owners ", 0.4),
            ConsumerAttribute::new("dog owners", 0.6),
            ConsumerAttribute::new("Vapers", -0.3),
            ConsumerAttribute::new("Travelers", 0.6),
            ConsumerAttribute::new("Moms", 0.2),
        ];
        let top = normalizer.top_attributes(&attributes);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "dog owners");
        assert_relative_eq!(top[0].relevance, 0.6);
        assert_eq!(top[1].name, "travelers");
    }

    #[test]
    fn test_brand_normalization() {
        let mut brand = BrandProfile::new("b1", "Kibble Co", "pet care");
        brand.attributes = vec![ConsumerAttribute::new("Dog Owners", 1.0)];
        brand.audience_description = Some("Suburban moms who travel".to_string());
        brand.markets = vec!["Chicago".to_string(), "chicago".to_string(), "National".to_string()];

        let normalized = Normalizer::default().normalize_brand(&brand).unwrap();
        assert_eq!(normalized.industry, IndustryCategory::PetCare);
        assert!(normalized.attributes.contains("dog owners"));
        assert!(normalized.attributes.contains("moms"));
        assert!(normalized.attributes.contains("travelers"));
        assert_eq!(normalized.markets.len(), 2);
        assert!(normalized.demographics.is_empty());
    }

    #[test]
    fn test_unknown_industry_and_market() {
        let brand = BrandProfile::new("b2", "Mystery", "Space Tourism");
        let err = Normalizer::default().normalize_brand(&brand).unwrap_err();
        assert!(matches!(err, ScoringError::SchemaMismatch { axis: Axis::Industry, .. }));

        let mut artist = ArtistProfile::new("a2", "Nomad");
        artist.markets = vec!["Atlantis".to_string()];
        let err = Normalizer::default().normalize_artist(&artist).unwrap_err();
        assert!(matches!(err, ScoringError::SchemaMismatch { axis: Axis::Market, .. }));
    }

    #[test]
    fn test_artist_from_audience_text() {
        let mut artist = ArtistProfile::new("a3", "Text Only");
        artist.audience_text = Some(
            "Gender\nFemale\n70%\nMale\n30%\nAge\n21-29 Years Old\n+0.40\nConsumer Attributes\nCoffee Houses\n+0.5"
                .to_string(),
        );
        let normalized = Normalizer::default().normalize_artist(&artist).unwrap();

        let age = normalized.demographics.age.unwrap();
        assert_relative_eq!(age[0], 0.4);
        assert_relative_eq!(age[1], 0.4);
        assert_relative_eq!(age[2], 0.0);
        assert_eq!(normalized.top_attributes[0].name, "coffee houses");
    }
}
