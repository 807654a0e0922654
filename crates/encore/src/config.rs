//! Engine configuration.
//!
//! Loaded from TOML; every field falls back to its default when omitted.

use crate::error::{EngineError, Result};
use encore_scoring::{IndustryAttributeMap, IndustryLink, KeywordLexicon, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default media-spend threshold in USD.
pub const DEFAULT_MIN_MEDIA_SPEND: f64 = 5_000_000.0;

/// Default number of matches per artist in the top-matches export.
pub const DEFAULT_TOP_N: usize = 50;

/// Configuration for a match run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Normalization and scoring parameters
    pub scoring: ScoringConfig,
    /// Brands must spend strictly more than this (USD); 0 disables the filter
    pub min_media_spend: f64,
    /// Matches per artist in the top-matches export
    pub top_n: usize,
    /// Replacement for the built-in attribute to industry table
    pub industry_map: Option<Vec<IndustryLink>>,
    /// Extra description keywords, keyword -> attribute
    pub extra_keywords: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            min_media_spend: DEFAULT_MIN_MEDIA_SPEND,
            top_n: DEFAULT_TOP_N,
            industry_map: None,
            extra_keywords: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Default configuration file location.
    ///
    /// - Linux: `~/.config/encore/config.toml`
    /// - macOS: `~/Library/Application Support/encore/config.toml`
    /// - Windows: `%APPDATA%\encore\config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("encore")
            .join("config.toml")
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, else the default location if it exists, else
    /// the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = Self::default_path();
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "Loading configuration");
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate every parameter.
    ///
    /// Weight problems surface as
    /// [`encore_scoring::ScoringError::WeightConfiguration`].
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if !self.min_media_spend.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "min_media_spend must be finite, got {}",
                self.min_media_spend
            )));
        }
        if self.top_n == 0 {
            return Err(EngineError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        self.industry_map()?;
        Ok(())
    }

    /// Attribute to industry table for the run.
    pub fn industry_map(&self) -> Result<IndustryAttributeMap> {
        match &self.industry_map {
            Some(links) => Ok(IndustryAttributeMap::from_links(links)?),
            None => Ok(IndustryAttributeMap::default()),
        }
    }

    /// Keyword lexicon covering `map` plus the configured extra keywords.
    pub fn lexicon(&self, map: &IndustryAttributeMap) -> KeywordLexicon {
        let mut lexicon = KeywordLexicon::for_attribute_map(map);
        for (keyword, attribute) in &self.extra_keywords {
            lexicon.insert(keyword, attribute);
        }
        lexicon
    }
}
