//! Scoring configuration.

use crate::component::GeographyConfig;
use crate::composite::{ComponentVariance, Weights};
use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};

/// Configuration for normalization and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Component weights
    pub weights: Weights,
    /// Per-component variances for the standard error
    pub variance: ComponentVariance,
    /// Share of geography in the context sub-score
    pub geographic_share: f64,
    /// Multiplier applied to the standard error for the interval
    pub confidence_z: f64,
    /// Geographic partial-credit parameters
    pub geography: GeographyConfig,
    /// Number of artist attributes kept for matching
    pub top_attributes: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            variance: ComponentVariance::default(),
            geographic_share: 0.5,
            confidence_z: 1.96,
            geography: GeographyConfig::default(),
            top_attributes: 10,
        }
    }
}

impl ScoringConfig {
    /// Validate every parameter. Weight errors surface as
    /// [`ScoringError::WeightConfiguration`].
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.variance.validate()?;
        self.geography.validate()?;
        if !(0.0..=1.0).contains(&self.geographic_share) {
            return Err(ScoringError::InvalidParameter(format!(
                "geographic_share must be in [0, 1], got {}",
                self.geographic_share
            )));
        }
        if !self.confidence_z.is_finite() || self.confidence_z <= 0.0 {
            return Err(ScoringError::InvalidParameter(format!(
                "confidence_z must be positive, got {}",
                self.confidence_z
            )));
        }
        if self.top_attributes == 0 {
            return Err(ScoringError::InvalidParameter(
                "top_attributes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
