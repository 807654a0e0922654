//! Artist-relative match tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Match quality relative to the artist's own score distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchTier {
    /// z > 2
    Exceptional,
    /// 1 <= z <= 2
    Strong,
    /// -1 < z < 1
    Good,
    /// z <= -1
    Fair,
}

impl MatchTier {
    /// All tiers, best first.
    pub const ALL: [Self; 4] = [Self::Exceptional, Self::Strong, Self::Good, Self::Fair];

    /// Classify a z-score. The upper bound of each band is inclusive except
    /// for Exceptional, so z = 2.0 is Strong.
    pub fn from_z_score(z: f64) -> Self {
        if z > 2.0 {
            Self::Exceptional
        } else if z >= 1.0 {
            Self::Strong
        } else if z > -1.0 {
            Self::Good
        } else {
            Self::Fair
        }
    }

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exceptional => "Exceptional",
            Self::Strong => "Strong",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
