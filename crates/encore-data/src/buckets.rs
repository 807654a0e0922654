//! Fixed demographic bucket enumerations.
//!
//! Every bucket label found in an extract must resolve to one of these
//! enumerations. Age and income come in two native schemes (the artist
//! analytics export and the brand audience export); both schemes share one
//! enumeration so the normalizer can re-bin between them using each bucket's
//! numeric range. The brand-native scheme is the canonical one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Demographic axis (or other labelled field) a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Gender split
    Gender,
    /// Age buckets
    Age,
    /// Household income buckets
    Income,
    /// Ethnicity buckets
    Ethnicity,
    /// Brand industry category
    Industry,
    /// Geographic market
    Market,
}

impl Axis {
    /// Lowercase axis name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Income => "income",
            Self::Ethnicity => "ethnicity",
            Self::Industry => "industry",
            Self::Market => "market",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How index values on the age, income and ethnicity axes are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexConvention {
    /// 100 is the population average, 130 means 30% over-indexed.
    #[default]
    Base100,
    /// 0 is the population average, +0.30 means 30% over-indexed.
    Signed,
}

impl IndexConvention {
    /// Convert a raw index value into a signed fractional deviation from the
    /// population average.
    pub fn deviation(&self, value: f64) -> f64 {
        match self {
            Self::Base100 => (value - 100.0) / 100.0,
            Self::Signed => value,
        }
    }
}

/// Half-open numeric range `[start, end)` covered by a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketRange {
    /// Inclusive lower bound
    pub start: f64,
    /// Exclusive upper bound
    pub end: f64,
}

impl BucketRange {
    /// Create a new range.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Width of the range.
    pub fn width(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Width of the intersection with another range (0 when disjoint).
    pub fn overlap(&self, other: &Self) -> f64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0.0)
    }
}

/// Lowercase, trim and collapse a raw label for matching.
fn clean_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['\u{2013}', '\u{2014}'], "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gender categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Female
    Female,
    /// Male
    Male,
    /// Non-binary or otherwise unspecified
    NonBinary,
}

impl Gender {
    /// All gender categories in vector order.
    pub const ALL: [Self; 3] = [Self::Female, Self::Male, Self::NonBinary];

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
            Self::NonBinary => "Non-Binary",
        }
    }

    /// Resolve a raw label.
    pub fn parse(raw: &str) -> Option<Self> {
        match clean_label(raw).as_str() {
            "female" | "women" | "woman" | "f" => Some(Self::Female),
            "male" | "men" | "man" | "m" => Some(Self::Male),
            "non-binary" | "nonbinary" | "non binary" | "other" => Some(Self::NonBinary),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Age buckets from both native schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    /// Artist scheme: 16-20
    From16To20,
    /// Artist scheme: 21-29
    From21To29,
    /// Artist scheme: 30-39
    From30To39,
    /// Artist scheme: 40-49
    From40To49,
    /// Artist scheme: 50-59
    From50To59,
    /// Artist scheme: 60+
    Over60,
    /// Brand scheme: 18-24
    From18To24,
    /// Brand scheme: 25-34
    From25To34,
    /// Brand scheme: 35-44
    From35To44,
    /// Brand scheme: 45-54
    From45To54,
    /// Brand scheme: 55-64
    From55To64,
    /// Brand scheme: 65+
    Over65,
}

/// Oldest age considered for open-ended age buckets.
const AGE_CEILING: f64 = 76.0;

impl AgeBucket {
    /// Canonical (brand-native) scheme in vector order.
    pub const CANONICAL: [Self; 6] = [
        Self::From18To24,
        Self::From25To34,
        Self::From35To44,
        Self::From45To54,
        Self::From55To64,
        Self::Over65,
    ];

    /// Artist-native scheme.
    pub const ARTIST_NATIVE: [Self; 6] = [
        Self::From16To20,
        Self::From21To29,
        Self::From30To39,
        Self::From40To49,
        Self::From50To59,
        Self::Over60,
    ];

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::From16To20 => "16-20",
            Self::From21To29 => "21-29",
            Self::From30To39 => "30-39",
            Self::From40To49 => "40-49",
            Self::From50To59 => "50-59",
            Self::Over60 => "60+",
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55To64 => "55-64",
            Self::Over65 => "65+",
        }
    }

    /// Ages covered, as a half-open range of years.
    pub const fn range(&self) -> BucketRange {
        match self {
            Self::From16To20 => BucketRange::new(16.0, 21.0),
            Self::From21To29 => BucketRange::new(21.0, 30.0),
            Self::From30To39 => BucketRange::new(30.0, 40.0),
            Self::From40To49 => BucketRange::new(40.0, 50.0),
            Self::From50To59 => BucketRange::new(50.0, 60.0),
            Self::Over60 => BucketRange::new(60.0, AGE_CEILING),
            Self::From18To24 => BucketRange::new(18.0, 25.0),
            Self::From25To34 => BucketRange::new(25.0, 35.0),
            Self::From35To44 => BucketRange::new(35.0, 45.0),
            Self::From45To54 => BucketRange::new(45.0, 55.0),
            Self::From55To64 => BucketRange::new(55.0, 65.0),
            Self::Over65 => BucketRange::new(65.0, AGE_CEILING),
        }
    }

    /// Resolve a raw label such as `"21-29 Years Old"` or `"65+"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = clean_label(raw);
        let trimmed = ["years old", "year olds", "yrs", "years"]
            .iter()
            .find_map(|suffix| cleaned.strip_suffix(suffix))
            .unwrap_or(cleaned.as_str())
            .replace(' ', "");
        let normalized = trimmed
            .strip_suffix("andover")
            .or_else(|| trimmed.strip_suffix("orolder"))
            .map_or_else(|| trimmed.clone(), |base| format!("{base}+"));

        Self::ARTIST_NATIVE
            .iter()
            .chain(Self::CANONICAL.iter())
            .copied()
            .find(|bucket| bucket.label() == normalized)
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Household income buckets from both native schemes, in thousands of USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeBucket {
    /// Artist scheme: less than $30K
    Under30k,
    /// Artist scheme: $30K-$49K
    From30kTo49k,
    /// Artist scheme: $50K-$74K
    From50kTo74k,
    /// Artist scheme: $75K-$125K
    From75kTo125k,
    /// Artist scheme: $125K or more
    Over125k,
    /// Brand scheme: under $25,000
    Under25k,
    /// Brand scheme: $25,000 - $50,000
    From25kTo50k,
    /// Brand scheme: $50,000 - $100,000
    From50kTo100k,
    /// Brand scheme: $100,000 - $150,000
    From100kTo150k,
    /// Brand scheme: $150,000+
    Over150k,
}

/// Income ceiling (thousands) for open-ended buckets.
const INCOME_CEILING: f64 = 250.0;

/// Accepted spellings, after lowercasing and stripping spaces, `$` and `,`.
const INCOME_ALIASES: &[(&str, IncomeBucket)] = &[
    ("lessthan30k", IncomeBucket::Under30k),
    ("under30k", IncomeBucket::Under30k),
    ("<30k", IncomeBucket::Under30k),
    ("30k-49k", IncomeBucket::From30kTo49k),
    ("30k-50k", IncomeBucket::From30kTo49k),
    ("50k-74k", IncomeBucket::From50kTo74k),
    ("50k-75k", IncomeBucket::From50kTo74k),
    ("75k-125k", IncomeBucket::From75kTo125k),
    ("125kormore", IncomeBucket::Over125k),
    ("125k+", IncomeBucket::Over125k),
    ("under25000", IncomeBucket::Under25k),
    ("lessthan25000", IncomeBucket::Under25k),
    ("under25k", IncomeBucket::Under25k),
    ("25000-50000", IncomeBucket::From25kTo50k),
    ("25k-50k", IncomeBucket::From25kTo50k),
    ("50000-100000", IncomeBucket::From50kTo100k),
    ("50k-100k", IncomeBucket::From50kTo100k),
    ("100000-150000", IncomeBucket::From100kTo150k),
    ("100k-150k", IncomeBucket::From100kTo150k),
    ("150000+", IncomeBucket::Over150k),
    ("150000ormore", IncomeBucket::Over150k),
    ("150k+", IncomeBucket::Over150k),
];

impl IncomeBucket {
    /// Canonical (brand-native) scheme in vector order.
    pub const CANONICAL: [Self; 5] = [
        Self::Under25k,
        Self::From25kTo50k,
        Self::From50kTo100k,
        Self::From100kTo150k,
        Self::Over150k,
    ];

    /// Artist-native scheme.
    pub const ARTIST_NATIVE: [Self; 5] = [
        Self::Under30k,
        Self::From30kTo49k,
        Self::From50kTo74k,
        Self::From75kTo125k,
        Self::Over125k,
    ];

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Under30k => "Less than $30K",
            Self::From30kTo49k => "$30K-$49K",
            Self::From50kTo74k => "$50K-$74K",
            Self::From75kTo125k => "$75K-$125K",
            Self::Over125k => "$125K or More",
            Self::Under25k => "Under $25,000",
            Self::From25kTo50k => "$25,000 - $50,000",
            Self::From50kTo100k => "$50,000 - $100,000",
            Self::From100kTo150k => "$100,000 - $150,000",
            Self::Over150k => "$150,000+",
        }
    }

    /// Income covered, in thousands of USD, as a half-open range.
    pub const fn range(&self) -> BucketRange {
        match self {
            Self::Under30k => BucketRange::new(0.0, 30.0),
            Self::From30kTo49k => BucketRange::new(30.0, 50.0),
            Self::From50kTo74k => BucketRange::new(50.0, 75.0),
            Self::From75kTo125k => BucketRange::new(75.0, 125.0),
            Self::Over125k => BucketRange::new(125.0, INCOME_CEILING),
            Self::Under25k => BucketRange::new(0.0, 25.0),
            Self::From25kTo50k => BucketRange::new(25.0, 50.0),
            Self::From50kTo100k => BucketRange::new(50.0, 100.0),
            Self::From100kTo150k => BucketRange::new(100.0, 150.0),
            Self::Over150k => BucketRange::new(150.0, INCOME_CEILING),
        }
    }

    /// Resolve a raw label such as `"$75K-$125k"` or `"$150,000+"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = clean_label(raw)
            .chars()
            .filter(|c| !matches!(c, ' ' | '$' | ','))
            .collect();
        INCOME_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, bucket)| *bucket)
    }
}

impl fmt::Display for IncomeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ethnicity buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ethnicity {
    /// White
    White,
    /// Hispanic or Latino
    Hispanic,
    /// African American
    AfricanAmerican,
    /// Asian
    Asian,
    /// Other
    Other,
}

impl Ethnicity {
    /// All ethnicity buckets in vector order.
    pub const ALL: [Self; 5] = [
        Self::White,
        Self::Hispanic,
        Self::AfricanAmerican,
        Self::Asian,
        Self::Other,
    ];

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Hispanic => "Hispanic",
            Self::AfricanAmerican => "African American",
            Self::Asian => "Asian",
            Self::Other => "Other",
        }
    }

    /// Resolve a raw label.
    pub fn parse(raw: &str) -> Option<Self> {
        match clean_label(raw).as_str() {
            "white" | "caucasian" => Some(Self::White),
            "hispanic" | "latino" | "latinx" | "hispanic/latino" | "hispanic or latino" => {
                Some(Self::Hispanic)
            }
            "african american" | "black" | "black/african american" | "african-american" => {
                Some(Self::AfricanAmerican)
            }
            "asian" | "asian american" | "asian/pacific islander" => Some(Self::Asian),
            "other" | "multiracial" | "mixed" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Ethnicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
