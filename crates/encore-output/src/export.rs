//! Export of match tables.
//!
//! Provides CSV and JSON export for ranked matches. Component scores are
//! written on a 0-100 scale and per-axis similarities on 0-1; missing values
//! are empty CSV cells or JSON `null`.

use encore_rank::{MatchScore, MatchTier, RankedMatches};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output was not UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// DataFrame construction error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize records as CSV with a header row.
pub(crate) fn write_csv<'a, T, I>(records: I) -> Result<String, ExportError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// One row of the match table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRow {
    /// Artist display name.
    #[serde(rename = "Artist_Name")]
    pub artist_name: String,

    /// Brand display name.
    #[serde(rename = "Brand_Name")]
    pub brand_name: String,

    /// Brand industry.
    #[serde(rename = "Brand_Industry")]
    pub brand_industry: String,

    /// Composite score (0-100).
    #[serde(rename = "Composite_Match_Score")]
    pub composite_match_score: Option<f64>,

    /// Demographic score (0-100).
    #[serde(rename = "Demographic_Score")]
    pub demographic_score: Option<f64>,

    /// Consumer-attribute score (0-100).
    #[serde(rename = "Attribute_Score")]
    pub attribute_score: Option<f64>,

    /// Geographic score (0-100).
    #[serde(rename = "Geographic_Score")]
    pub geographic_score: Option<f64>,

    /// Age similarity (0-1).
    #[serde(rename = "Age_Similarity")]
    pub age_similarity: Option<f64>,

    /// Gender similarity (0-1).
    #[serde(rename = "Gender_Similarity")]
    pub gender_similarity: Option<f64>,

    /// Income similarity (0-1).
    #[serde(rename = "Income_Similarity")]
    pub income_similarity: Option<f64>,

    /// Ethnicity similarity (0-1).
    #[serde(rename = "Ethnicity_Similarity")]
    pub ethnicity_similarity: Option<f64>,

    /// Number of matching consumer attributes.
    #[serde(rename = "Consumer_Attribute_Matches")]
    pub consumer_attribute_matches: Option<usize>,

    /// Lower confidence bound.
    #[serde(rename = "Confidence_Interval_Lower")]
    pub confidence_interval_lower: Option<f64>,

    /// Upper confidence bound.
    #[serde(rename = "Confidence_Interval_Upper")]
    pub confidence_interval_upper: Option<f64>,

    /// Two-sided p-value against the artist mean.
    #[serde(rename = "Match_P_Value")]
    pub match_p_value: Option<f64>,

    /// Artist-relative tier.
    #[serde(rename = "Match_Tier")]
    pub match_tier: Option<MatchTier>,

    /// Rank within the artist's scored matches.
    #[serde(rename = "Rank_Within_Artist")]
    pub rank_within_artist: Option<usize>,
}

impl MatchRow {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 17] = [
        "Artist_Name",
        "Brand_Name",
        "Brand_Industry",
        "Composite_Match_Score",
        "Demographic_Score",
        "Attribute_Score",
        "Geographic_Score",
        "Age_Similarity",
        "Gender_Similarity",
        "Income_Similarity",
        "Ethnicity_Similarity",
        "Consumer_Attribute_Matches",
        "Confidence_Interval_Lower",
        "Confidence_Interval_Upper",
        "Match_P_Value",
        "Match_Tier",
        "Rank_Within_Artist",
    ];
}

impl From<&MatchScore> for MatchRow {
    fn from(score: &MatchScore) -> Self {
        let components = score.components();
        let composite = score.composite();
        Self {
            artist_name: score.artist_name().to_string(),
            brand_name: score.brand_name().to_string(),
            brand_industry: score.industry().name().to_string(),
            composite_match_score: score.composite_score(),
            demographic_score: components.map(|c| c.demographic * 100.0),
            attribute_score: components.map(|c| c.attribute * 100.0),
            geographic_score: components.map(|c| c.geographic * 100.0),
            age_similarity: components.and_then(|c| c.age),
            gender_similarity: components.and_then(|c| c.gender),
            income_similarity: components.and_then(|c| c.income),
            ethnicity_similarity: components.and_then(|c| c.ethnicity),
            consumer_attribute_matches: components.map(|c| c.attribute_matches),
            confidence_interval_lower: composite.map(|c| c.ci_lower),
            confidence_interval_upper: composite.map(|c| c.ci_upper),
            match_p_value: score.p_value(),
            match_tier: score.tier(),
            rank_within_artist: score.rank(),
        }
    }
}

/// Flat match table, artists in ranked-run order and matches by rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    rows: Vec<MatchRow>,
}

impl MatchTable {
    /// Every match of every artist.
    pub fn from_ranked(ranked: &[RankedMatches]) -> Self {
        let rows = ranked
            .iter()
            .flat_map(|artist| artist.matches().iter().map(MatchRow::from))
            .collect();
        Self { rows }
    }

    /// Best `n` scored matches of each artist.
    pub fn top_per_artist(ranked: &[RankedMatches], n: usize) -> Self {
        let rows = ranked
            .iter()
            .flat_map(|artist| artist.top(n).map(MatchRow::from))
            .collect();
        Self { rows }
    }

    /// Table rows.
    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to a Polars DataFrame with the output column names.
    pub fn to_dataframe(&self) -> Result<DataFrame, ExportError> {
        let rows = &self.rows;
        let artists: Vec<&str> = rows.iter().map(|r| r.artist_name.as_str()).collect();
        let brands: Vec<&str> = rows.iter().map(|r| r.brand_name.as_str()).collect();
        let industries: Vec<&str> = rows.iter().map(|r| r.brand_industry.as_str()).collect();
        let composite: Vec<Option<f64>> = rows.iter().map(|r| r.composite_match_score).collect();
        let demographic: Vec<Option<f64>> = rows.iter().map(|r| r.demographic_score).collect();
        let attribute: Vec<Option<f64>> = rows.iter().map(|r| r.attribute_score).collect();
        let geographic: Vec<Option<f64>> = rows.iter().map(|r| r.geographic_score).collect();
        let age: Vec<Option<f64>> = rows.iter().map(|r| r.age_similarity).collect();
        let gender: Vec<Option<f64>> = rows.iter().map(|r| r.gender_similarity).collect();
        let income: Vec<Option<f64>> = rows.iter().map(|r| r.income_similarity).collect();
        let ethnicity: Vec<Option<f64>> = rows.iter().map(|r| r.ethnicity_similarity).collect();
        let matches: Vec<Option<u64>> = rows
            .iter()
            .map(|r| r.consumer_attribute_matches.map(|n| n as u64))
            .collect();
        let ci_lower: Vec<Option<f64>> = rows.iter().map(|r| r.confidence_interval_lower).collect();
        let ci_upper: Vec<Option<f64>> = rows.iter().map(|r| r.confidence_interval_upper).collect();
        let p_values: Vec<Option<f64>> = rows.iter().map(|r| r.match_p_value).collect();
        let tiers: Vec<Option<&str>> = rows
            .iter()
            .map(|r| r.match_tier.map(|tier| tier.name()))
            .collect();
        let ranks: Vec<Option<u64>> = rows
            .iter()
            .map(|r| r.rank_within_artist.map(|n| n as u64))
            .collect();

        let df = DataFrame::new(vec![
            Series::new("Artist_Name".into(), artists).into(),
            Series::new("Brand_Name".into(), brands).into(),
            Series::new("Brand_Industry".into(), industries).into(),
            Series::new("Composite_Match_Score".into(), composite).into(),
            Series::new("Demographic_Score".into(), demographic).into(),
            Series::new("Attribute_Score".into(), attribute).into(),
            Series::new("Geographic_Score".into(), geographic).into(),
            Series::new("Age_Similarity".into(), age).into(),
            Series::new("Gender_Similarity".into(), gender).into(),
            Series::new("Income_Similarity".into(), income).into(),
            Series::new("Ethnicity_Similarity".into(), ethnicity).into(),
            Series::new("Consumer_Attribute_Matches".into(), matches).into(),
            Series::new("Confidence_Interval_Lower".into(), ci_lower).into(),
            Series::new("Confidence_Interval_Upper".into(), ci_upper).into(),
            Series::new("Match_P_Value".into(), p_values).into(),
            Series::new("Match_Tier".into(), tiers).into(),
            Series::new("Rank_Within_Artist".into(), ranks).into(),
        ])?;

        Ok(df)
    }
}

impl Exporter for MatchTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                if self.rows.is_empty() {
                    // header only
                    let mut wtr = csv::Writer::from_writer(vec![]);
                    wtr.write_record(MatchRow::COLUMNS)?;
                    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                    return Ok(String::from_utf8(bytes)?);
                }
                write_csv(&self.rows)
            }
            ExportFormat::Json => Ok(serde_json::to_string(&self.rows)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&self.rows)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(artist: &str, brand: &str, score: Option<f64>) -> MatchRow {
        MatchRow {
            artist_name: artist.to_string(),
            brand_name: brand.to_string(),
            brand_industry: "Pet Care".to_string(),
            composite_match_score: score,
            demographic_score: score.map(|_| 90.0),
            attribute_score: score.map(|_| 50.0),
            geographic_score: score.map(|_| 40.0),
            age_similarity: score.map(|_| 0.8),
            gender_similarity: score.map(|_| 0.95),
            income_similarity: None,
            ethnicity_similarity: None,
            consumer_attribute_matches: score.map(|_| 2),
            confidence_interval_lower: score.map(|s| s - 9.19),
            confidence_interval_upper: score.map(|s| s + 9.19),
            match_p_value: score.map(|_| 0.5),
            match_tier: score.map(|_| MatchTier::Strong),
            rank_within_artist: score.map(|_| 1),
        }
    }

    fn table() -> MatchTable {
        MatchTable {
            rows: vec![row("Velvet", "Kibble Co", Some(71.0)), row("Velvet", "Nimbus", None)],
        }
    }

    #[test]
    fn test_csv_header_and_empty_cells() {
        let csv = table().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), MatchRow::COLUMNS.join(","));
        assert!(lines.next().unwrap().starts_with("Velvet,Kibble Co,Pet Care,71.0,90.0,"));
        assert_eq!(lines.next().unwrap(), "Velvet,Nimbus,Pet Care,,,,,,,,,,,,,,");
    }

    #[test]
    fn test_csv_empty_table_has_header() {
        let csv = MatchTable::default().export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.trim_end(), MatchRow::COLUMNS.join(","));
    }

    #[test]
    fn test_json_nulls() {
        let json = table().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"Composite_Match_Score\":71.0"));
        assert!(json.contains("\"Composite_Match_Score\":null"));
        assert!(json.contains("\"Match_Tier\":\"Strong\""));

        let pretty = table().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains("  "));
    }

    #[test]
    fn test_dataframe_columns() {
        let df = table().to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 17);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, MatchRow::COLUMNS.to_vec());
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join("encore_match_table_test.csv");
        table().export_to_file(&path, ExportFormat::Csv).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Kibble Co"));
        std::fs::remove_file(path).ok();
    }

    #[rstest]
    #[case(ExportFormat::Csv, "csv")]
    #[case(ExportFormat::Json, "json")]
    #[case(ExportFormat::PrettyJson, "json")]
    fn test_export_format_extension(#[case] format: ExportFormat, #[case] extension: &str) {
        assert_eq!(format.extension(), extension);
    }
}
