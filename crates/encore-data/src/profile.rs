//! Artist and brand profile records as delivered by an extract.
//!
//! Bucket labels are kept exactly as the extract spells them; the normalizer
//! resolves them against the fixed enumerations in [`crate::buckets`].

use crate::audience_text::parse_audience_text;
use crate::buckets::IndexConvention;
use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which side of the match a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Artist audience record
    Artist,
    /// Brand target-audience record
    Brand,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artist => write!(f, "artist"),
            Self::Brand => write!(f, "brand"),
        }
    }
}

/// Audience demographics in a record's native bucket scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    /// Gender label -> fraction of the audience
    pub gender: BTreeMap<String, f64>,
    /// Age bucket label -> index value
    pub age: BTreeMap<String, f64>,
    /// Household income bucket label -> index value
    pub income: BTreeMap<String, f64>,
    /// Ethnicity bucket label -> index value
    pub ethnicity: BTreeMap<String, f64>,
    /// Convention used by the age, income and ethnicity index values
    pub index_convention: IndexConvention,
}

impl Demographics {
    /// Whether every axis is empty.
    pub fn is_empty(&self) -> bool {
        self.gender.is_empty()
            && self.age.is_empty()
            && self.income.is_empty()
            && self.ethnicity.is_empty()
    }
}

/// A named audience trait with a relevance weight (e.g. "Dog Owners", 0.45).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerAttribute {
    /// Attribute name
    pub name: String,
    /// Relevance of the attribute for the audience
    pub relevance: f64,
}

impl ConsumerAttribute {
    /// Create a new consumer attribute.
    pub fn new(name: impl Into<String>, relevance: f64) -> Self {
        Self {
            name: name.into(),
            relevance,
        }
    }
}

/// An artist audience record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistProfile {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Primary genre
    #[serde(default)]
    pub genre: Option<String>,
    /// Structured demographics
    #[serde(default)]
    pub demographics: Option<Demographics>,
    /// Consumer attributes with relevance scores
    #[serde(default)]
    pub attributes: Vec<ConsumerAttribute>,
    /// Tour markets
    #[serde(default)]
    pub markets: Vec<String>,
    /// Structured audience text export, used when `demographics` is absent
    #[serde(default)]
    pub audience_text: Option<String>,
}

impl ArtistProfile {
    /// Create an artist with no audience data.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            genre: None,
            demographics: None,
            attributes: Vec::new(),
            markets: Vec::new(),
            audience_text: None,
        }
    }

    /// Demographics and attributes to score with.
    ///
    /// Structured fields win; when demographics are absent and audience text
    /// is present, the text is parsed, and its attributes are used if the
    /// record carries none of its own.
    pub fn resolved_audience(&self) -> Result<(Demographics, Vec<ConsumerAttribute>)> {
        match (&self.demographics, &self.audience_text) {
            (Some(demographics), _) => Ok((demographics.clone(), self.attributes.clone())),
            (None, Some(text)) => {
                let parsed = parse_audience_text(text).map_err(|err| DataError::AudienceText {
                    profile: self.id.clone(),
                    reason: err.to_string(),
                })?;
                let attributes = if self.attributes.is_empty() {
                    parsed.attributes
                } else {
                    self.attributes.clone()
                };
                Ok((parsed.demographics, attributes))
            }
            (None, None) => Ok((Demographics::default(), self.attributes.clone())),
        }
    }
}

/// A brand audience record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Industry label from the taxonomy
    pub industry: String,
    /// Annual media spend in USD (pre-filter only)
    #[serde(default)]
    pub media_spend: Option<f64>,
    /// Structured demographics
    #[serde(default)]
    pub demographics: Option<Demographics>,
    /// Consumer attributes the brand targets
    #[serde(default)]
    pub attributes: Vec<ConsumerAttribute>,
    /// Markets the brand is active in
    #[serde(default)]
    pub markets: Vec<String>,
    /// Free-text audience description
    #[serde(default)]
    pub audience_description: Option<String>,
}

impl BrandProfile {
    /// Create a brand with no audience data.
    pub fn new(id: impl Into<String>, name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            industry: industry.into(),
            media_spend: None,
            demographics: None,
            attributes: Vec::new(),
            markets: Vec::new(),
            audience_description: None,
        }
    }

    /// Whether the brand clears a media-spend threshold (strictly greater).
    ///
    /// A non-positive threshold disables the filter; otherwise brands with
    /// unknown spend do not pass.
    pub fn passes_spend_filter(&self, min_media_spend: f64) -> bool {
        if min_media_spend <= 0.0 {
            return true;
        }
        self.media_spend.is_some_and(|spend| spend > min_media_spend)
    }
}
