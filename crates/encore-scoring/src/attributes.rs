//! Static attribute lookups: consumer attribute to industry correlations, and
//! description keywords to consumer attributes.

use crate::error::{Result, ScoringError};
use encore_data::IndustryCategory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One (attribute, industry, strength) entry of the industry attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryLink {
    /// Consumer attribute name (matched case-insensitively)
    pub attribute: String,
    /// Industry the attribute correlates with
    pub industry: IndustryCategory,
    /// Correlation strength in `[0, 1]`
    pub strength: f64,
}

impl IndustryLink {
    /// Create a new link.
    pub fn new(attribute: impl Into<String>, industry: IndustryCategory, strength: f64) -> Self {
        Self {
            attribute: attribute.into(),
            industry,
            strength,
        }
    }
}

/// Lookup from consumer attribute to the industries it correlates with.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryAttributeMap {
    entries: BTreeMap<String, BTreeMap<IndustryCategory, f64>>,
}

/// Default correlation table.
const DEFAULT_LINKS: &[(&str, IndustryCategory, f64)] = &[
    ("hard seltzer", IndustryCategory::AlcoholicBeverages, 0.9),
    ("hard seltzer", IndustryCategory::NonAlcoholicBeverages, 0.3),
    ("coffee houses", IndustryCategory::Restaurants, 0.7),
    ("coffee houses", IndustryCategory::NonAlcoholicBeverages, 0.6),
    ("dog owners", IndustryCategory::PetCare, 0.9),
    ("movie goers", IndustryCategory::Entertainment, 0.8),
    ("movie goers", IndustryCategory::Streaming, 0.5),
    ("movie goers", IndustryCategory::Media, 0.4),
    ("travelers", IndustryCategory::Travel, 0.9),
    ("travelers", IndustryCategory::Hospitality, 0.8),
    ("vapers", IndustryCategory::Tobacco, 0.9),
    ("tea drinkers", IndustryCategory::NonAlcoholicBeverages, 0.7),
    ("moms", IndustryCategory::PackagedFoods, 0.6),
    ("moms", IndustryCategory::HouseholdGoods, 0.6),
    ("moms", IndustryCategory::Retail, 0.5),
    ("dads", IndustryCategory::Automotive, 0.5),
    ("dads", IndustryCategory::HomeImprovement, 0.5),
    ("dads", IndustryCategory::Sports, 0.5),
    ("dads", IndustryCategory::AlcoholicBeverages, 0.3),
    ("married", IndustryCategory::Insurance, 0.6),
    ("married", IndustryCategory::FinancialServices, 0.5),
    ("married", IndustryCategory::HomeImprovement, 0.4),
    ("quality conscious", IndustryCategory::Luxury, 0.7),
    ("budget conscious", IndustryCategory::Retail, 0.7),
    ("horror tv viewers", IndustryCategory::Streaming, 0.6),
    ("horror tv viewers", IndustryCategory::Entertainment, 0.5),
    ("reality tv viewers", IndustryCategory::Entertainment, 0.5),
    ("reality tv viewers", IndustryCategory::Media, 0.5),
    ("podcast listeners", IndustryCategory::Media, 0.6),
    ("podcast listeners", IndustryCategory::Streaming, 0.6),
    ("streamers", IndustryCategory::Streaming, 0.8),
    ("streamers", IndustryCategory::Entertainment, 0.5),
    ("streamers", IndustryCategory::Gaming, 0.5),
    ("cosmetics", IndustryCategory::Beauty, 0.9),
    ("cosmetics", IndustryCategory::PersonalCare, 0.6),
    ("snack food", IndustryCategory::PackagedFoods, 0.8),
    ("fast casual", IndustryCategory::Restaurants, 0.8),
    ("hybrid drivers", IndustryCategory::Automotive, 0.7),
    ("suv drivers", IndustryCategory::Automotive, 0.8),
];

impl Default for IndustryAttributeMap {
    fn default() -> Self {
        let mut entries: BTreeMap<String, BTreeMap<IndustryCategory, f64>> = BTreeMap::new();
        for &(attribute, industry, strength) in DEFAULT_LINKS {
            entries
                .entry(attribute.to_string())
                .or_default()
                .insert(industry, strength);
        }
        Self { entries }
    }
}

impl IndustryAttributeMap {
    /// Build a map from explicit links, replacing the default table.
    ///
    /// Fails if a strength lies outside `[0, 1]` or a pair is listed twice.
    pub fn from_links(links: &[IndustryLink]) -> Result<Self> {
        let mut entries: BTreeMap<String, BTreeMap<IndustryCategory, f64>> = BTreeMap::new();
        for link in links {
            if !(0.0..=1.0).contains(&link.strength) {
                return Err(ScoringError::InvalidParameter(format!(
                    "correlation strength {} for '{}' / {} must be in [0, 1]",
                    link.strength, link.attribute, link.industry
                )));
            }
            let attribute = normalize_name(&link.attribute);
            let previous = entries
                .entry(attribute)
                .or_default()
                .insert(link.industry, link.strength);
            if previous.is_some() {
                return Err(ScoringError::InvalidParameter(format!(
                    "duplicate correlation for '{}' / {}",
                    link.attribute, link.industry
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Correlation strength between an attribute and an industry.
    pub fn strength(&self, attribute: &str, industry: IndustryCategory) -> Option<f64> {
        self.entries
            .get(&normalize_name(attribute))
            .and_then(|industries| industries.get(&industry))
            .copied()
    }

    /// Attribute names present in the map.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Flatten back into links.
    pub fn links(&self) -> Vec<IndustryLink> {
        self.entries
            .iter()
            .flat_map(|(attribute, industries)| {
                industries
                    .iter()
                    .map(move |(&industry, &strength)| IndustryLink::new(attribute.clone(), industry, strength))
            })
            .collect()
    }

    /// Number of attributes in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase, trim and collapse whitespace.
pub(crate) fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extra keyword spellings that imply an attribute.
const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("dog", "dog owners"),
    ("dogs", "dog owners"),
    ("pet owners", "dog owners"),
    ("coffee", "coffee houses"),
    ("coffee drinkers", "coffee houses"),
    ("travel", "travelers"),
    ("travellers", "travelers"),
    ("frequent flyers", "travelers"),
    ("mothers", "moms"),
    ("fathers", "dads"),
    ("podcast", "podcast listeners"),
    ("podcasts", "podcast listeners"),
    ("movies", "movie goers"),
    ("moviegoers", "movie goers"),
    ("makeup", "cosmetics"),
    ("beauty", "cosmetics"),
    ("snacks", "snack food"),
    ("seltzer", "hard seltzer"),
    ("tea", "tea drinkers"),
    ("bargain hunters", "budget conscious"),
    ("value shoppers", "budget conscious"),
    ("streaming", "streamers"),
];

/// Keyword lookup used to infer brand attributes from free text.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordLexicon {
    keywords: BTreeMap<String, String>,
}

impl KeywordLexicon {
    /// Lexicon covering every attribute of `map` by name, plus the default
    /// synonyms.
    pub fn for_attribute_map(map: &IndustryAttributeMap) -> Self {
        let mut keywords: BTreeMap<String, String> = map
            .attributes()
            .map(|attribute| (attribute.to_string(), attribute.to_string()))
            .collect();
        for &(keyword, attribute) in DEFAULT_SYNONYMS {
            keywords.insert(keyword.to_string(), attribute.to_string());
        }
        Self { keywords }
    }

    /// Add (or replace) a keyword.
    pub fn insert(&mut self, keyword: &str, attribute: &str) {
        self.keywords
            .insert(normalize_name(keyword), normalize_name(attribute));
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Attributes whose keywords appear as whole words in `text`.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();
        let padded = format!(" {} ", words.join(" "));

        self.keywords
            .iter()
            .filter(|(keyword, _)| padded.contains(&format!(" {keyword} ")))
            .map(|(_, attribute)| attribute.clone())
            .collect()
    }
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self::for_attribute_map(&IndustryAttributeMap::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_lookup() {
        let map = IndustryAttributeMap::default();
        assert_eq!(map.strength("Dog Owners", IndustryCategory::PetCare), Some(0.9));
        assert_eq!(map.strength("dog owners", IndustryCategory::Retail), None);
        assert_eq!(map.strength("unknown", IndustryCategory::PetCare), None);
        assert_eq!(map.len(), 21);
    }

    #[test]
    fn test_default_strengths_in_range() {
        for link in IndustryAttributeMap::default().links() {
            assert!((0.0..=1.0).contains(&link.strength), "{link:?}");
        }
    }

    #[test]
    fn test_from_links_validates() {
        let bad = [IndustryLink::new("gamers", IndustryCategory::Gaming, 1.5)];
        assert!(IndustryAttributeMap::from_links(&bad).is_err());

        let duplicate = [
            IndustryLink::new("gamers", IndustryCategory::Gaming, 0.5),
            IndustryLink::new("Gamers", IndustryCategory::Gaming, 0.6),
        ];
        assert!(IndustryAttributeMap::from_links(&duplicate).is_err());

        let good = [IndustryLink::new("Gamers", IndustryCategory::Gaming, 0.8)];
        let map = IndustryAttributeMap::from_links(&good).unwrap();
        assert_eq!(map.strength("gamers", IndustryCategory::Gaming), Some(0.8));
    }

    #[test]
    fn test_keyword_extraction() {
        let lexicon = KeywordLexicon::default();
        let found = lexicon.extract("Busy moms, dog lovers and frequent flyers who love coffee.");
        let expected: BTreeSet<String> = ["moms", "dog owners", "travelers", "coffee houses"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_keyword_whole_words_only() {
        let lexicon = KeywordLexicon::default();
        assert!(lexicon.extract("Teams of dogsled racers").is_empty());
        assert!(lexicon.extract("").is_empty());
    }

    #[test]
    fn test_custom_keyword() {
        let mut lexicon = KeywordLexicon::default();
        lexicon.insert("Cat People", "Cat Owners");
        let found = lexicon.extract("cat people everywhere");
        assert!(found.contains("cat owners"));
    }
}
