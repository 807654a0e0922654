//! Composite Scorer
//!
//! Weighted combination of the component scores on a 0-100 scale:
//!
//! composite = 100 * (w_d * demographic + w_a * attribute + w_c * context)
//!
//! where context = s * geographic + (1 - s) * industry_affinity.
//!
//! The standard error treats the components as independent with fixed
//! variances:
//!
//! SE = 100 * sqrt(w_d^2 * var_d + w_a^2 * var_a + w_c^2 * var_c)

use crate::component::ComponentScores;
use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};

/// Tolerance on the weight sum.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Component weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Demographic weight
    pub demographic: f64,
    /// Consumer-attribute weight
    pub attribute: f64,
    /// Context (geography + industry) weight
    pub context: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            demographic: 0.60,
            attribute: 0.30,
            context: 0.10,
        }
    }
}

impl Weights {
    /// Create validated weights.
    pub fn new(demographic: f64, attribute: f64, context: f64) -> Result<Self> {
        let weights = Self {
            demographic,
            attribute,
            context,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Sum of the weights.
    pub fn sum(&self) -> f64 {
        self.demographic + self.attribute + self.context
    }

    /// Weights must be finite, non-negative and sum to 1.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("demographic", self.demographic),
            ("attribute", self.attribute),
            ("context", self.context),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::WeightConfiguration(format!(
                    "{name} weight must be finite and non-negative, got {value}"
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::WeightConfiguration(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Fixed per-component variances used for the standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentVariance {
    /// Variance of the demographic score
    pub demographic: f64,
    /// Variance of the attribute score
    pub attribute: f64,
    /// Variance of the context score
    pub context: f64,
}

impl Default for ComponentVariance {
    fn default() -> Self {
        Self {
            demographic: 0.0025,
            attribute: 0.01,
            context: 0.04,
        }
    }
}

impl ComponentVariance {
    /// Variances must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("demographic", self.demographic),
            ("attribute", self.attribute),
            ("context", self.context),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidParameter(format!(
                    "{name} variance must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Composite score with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// Composite score in [0, 100]
    pub score: f64,
    /// Standard error on the 0-100 scale
    pub standard_error: f64,
    /// Lower confidence bound, clipped at 0
    pub ci_lower: f64,
    /// Upper confidence bound, clipped at 100
    pub ci_upper: f64,
    /// Context sub-score in [0, 1]
    pub context: f64,
}

/// Combines component scores into a composite.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    weights: Weights,
    variance: ComponentVariance,
    geographic_share: f64,
    confidence_z: f64,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            variance: ComponentVariance::default(),
            geographic_share: 0.5,
            confidence_z: 1.96,
        }
    }
}

impl CompositeScorer {
    /// Build a scorer from validated configuration.
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            weights: config.weights,
            variance: config.variance,
            geographic_share: config.geographic_share,
            confidence_z: config.confidence_z,
        })
    }

    /// Weights in use.
    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Context sub-score from geography and the industry bonus.
    pub fn context(&self, geographic: f64, industry_affinity: f64) -> f64 {
        self.geographic_share * geographic + (1.0 - self.geographic_share) * industry_affinity
    }

    /// Weighted combination of the three sub-scores, on 0-100.
    pub fn combine(&self, demographic: f64, attribute: f64, context: f64) -> f64 {
        let w = &self.weights;
        (100.0 * (w.demographic * demographic + w.attribute * attribute + w.context * context))
            .clamp(0.0, 100.0)
    }

    /// Standard error of the composite, on 0-100.
    pub fn standard_error(&self) -> f64 {
        let w = &self.weights;
        let v = &self.variance;
        100.0
            * (w.demographic.powi(2) * v.demographic
                + w.attribute.powi(2) * v.attribute
                + w.context.powi(2) * v.context)
                .sqrt()
    }

    /// Score a pair from its components.
    pub fn score(&self, components: &ComponentScores) -> CompositeScore {
        let context = self.context(components.geographic, components.industry_affinity);
        let score = self.combine(components.demographic, components.attribute, context);
        let standard_error = self.standard_error();
        let half_width = self.confidence_z * standard_error;

        CompositeScore {
            score,
            standard_error,
            ci_lower: (score - half_width).max(0.0),
            ci_upper: (score + half_width).min(100.0),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn components(demographic: f64, attribute: f64, geographic: f64, industry: f64) -> ComponentScores {
        ComponentScores {
            demographic,
            age: None,
            gender: None,
            income: None,
            ethnicity: None,
            attribute,
            attribute_matches: 0,
            geographic,
            industry_affinity: industry,
        }
    }

    #[test]
    fn test_worked_example() {
        let scorer = CompositeScorer::default();
        assert_relative_eq!(scorer.combine(0.9, 0.5, 0.2), 71.0, epsilon = 1e-9);

        // geographic 0.4 and industry 0.0 give context 0.2
        let score = scorer.score(&components(0.9, 0.5, 0.4, 0.0));
        assert_relative_eq!(score.context, 0.2, epsilon = 1e-12);
        assert_relative_eq!(score.score, 71.0, epsilon = 1e-9);
    }

    #[test]
    fn test_standard_error_and_interval() {
        let scorer = CompositeScorer::default();
        // 100 * sqrt(0.36 * 0.0025 + 0.09 * 0.01 + 0.01 * 0.04) = 100 * sqrt(0.0022)
        let expected = 100.0 * 0.0022_f64.sqrt();
        assert_relative_eq!(scorer.standard_error(), expected, epsilon = 1e-9);

        let score = scorer.score(&components(0.9, 0.5, 0.4, 0.0));
        assert_relative_eq!(score.ci_lower, 71.0 - 1.96 * expected, epsilon = 1e-9);
        assert_relative_eq!(score.ci_upper, 71.0 + 1.96 * expected, epsilon = 1e-9);
    }

    #[test]
    fn test_interval_clipped() {
        let scorer = CompositeScorer::default();
        let top = scorer.score(&components(1.0, 1.0, 1.0, 1.0));
        assert_relative_eq!(top.score, 100.0, epsilon = 1e-9);
        assert_relative_eq!(top.ci_upper, 100.0);

        let bottom = scorer.score(&components(0.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(bottom.ci_lower, 0.0);
    }

    #[test]
    fn test_monotonic_in_each_component() {
        let scorer = CompositeScorer::default();
        let base = scorer.score(&components(0.5, 0.5, 0.5, 0.5)).score;
        assert!(scorer.score(&components(0.6, 0.5, 0.5, 0.5)).score > base);
        assert!(scorer.score(&components(0.5, 0.6, 0.5, 0.5)).score > base);
        assert!(scorer.score(&components(0.5, 0.5, 0.6, 0.5)).score > base);
        assert!(scorer.score(&components(0.5, 0.5, 0.5, 0.6)).score > base);
    }

    #[rstest]
    #[case(0.6, 0.3, 0.2)]
    #[case(0.5, 0.3, 0.1)]
    #[case(1.2, -0.3, 0.1)]
    #[case(f64::NAN, 0.5, 0.5)]
    #[case(f64::INFINITY, 0.0, 0.0)]
    fn test_invalid_weights(#[case] d: f64, #[case] a: f64, #[case] c: f64) {
        assert!(matches!(
            Weights::new(d, a, c),
            Err(ScoringError::WeightConfiguration(_))
        ));
    }

    #[test]
    fn test_valid_weights() {
        assert!(Weights::new(0.6, 0.3, 0.1).is_ok());
        assert!(Weights::new(1.0, 0.0, 0.0).is_ok());
        assert!(Weights::new(0.6, 0.3, 0.1 + 5e-7).is_ok());
    }
}
