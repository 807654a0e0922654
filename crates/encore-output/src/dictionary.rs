//! Data dictionary for the match table columns.

use crate::export::{ExportError, ExportFormat, Exporter, MatchRow, write_csv};
use serde::{Deserialize, Serialize};

const DESCRIPTIONS: [(&str, &str); 17] = [
    ("Artist_Name", "Artist display name"),
    ("Brand_Name", "Brand display name"),
    ("Brand_Industry", "Brand industry category"),
    (
        "Composite_Match_Score",
        "Weighted combination of demographic, attribute and context scores (0-100)",
    ),
    (
        "Demographic_Score",
        "Cosine similarity of the shared demographic axes mapped to 0-100",
    ),
    (
        "Attribute_Score",
        "Relevance-weighted share of the artist's top attributes that the brand targets (0-100)",
    ),
    (
        "Geographic_Score",
        "Market overlap between artist and brand (0-100)",
    ),
    ("Age_Similarity", "Age distribution similarity (0-1)"),
    ("Gender_Similarity", "Gender distribution similarity (0-1)"),
    ("Income_Similarity", "Household income distribution similarity (0-1)"),
    ("Ethnicity_Similarity", "Ethnicity distribution similarity (0-1)"),
    (
        "Consumer_Attribute_Matches",
        "Number of the artist's top attributes the brand also targets",
    ),
    ("Confidence_Interval_Lower", "Lower bound of the 95% confidence interval"),
    ("Confidence_Interval_Upper", "Upper bound of the 95% confidence interval"),
    (
        "Match_P_Value",
        "Two-sided p-value of the score against the artist's mean score",
    ),
    (
        "Match_Tier",
        "Exceptional (z > 2), Strong (1 <= z <= 2), Good (-1 < z < 1) or Fair (z <= -1)",
    ),
    (
        "Rank_Within_Artist",
        "Rank among the artist's scored matches, 1 is best",
    ),
];

/// One documented column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Column name as written in the match table.
    #[serde(rename = "Column")]
    pub column: String,

    /// What the column holds.
    #[serde(rename = "Description")]
    pub description: String,
}

/// Descriptions of every match table column, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDictionary {
    columns: Vec<ColumnDescription>,
}

impl Default for DataDictionary {
    fn default() -> Self {
        Self::for_match_table()
    }
}

impl DataDictionary {
    /// Dictionary of the match table.
    pub fn for_match_table() -> Self {
        let columns = DESCRIPTIONS
            .iter()
            .map(|(column, description)| ColumnDescription {
                column: (*column).to_string(),
                description: (*description).to_string(),
            })
            .collect();
        Self { columns }
    }

    /// Documented columns.
    pub fn columns(&self) -> &[ColumnDescription] {
        &self.columns
    }

    /// Description of a column.
    pub fn describe(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.description.as_str())
    }

    /// Whether every match table column is documented, in order.
    pub fn covers_match_table(&self) -> bool {
        self.columns
            .iter()
            .map(|c| c.column.as_str())
            .eq(MatchRow::COLUMNS.iter().copied())
    }
}

impl Exporter for DataDictionary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&self.columns),
            ExportFormat::Json => Ok(serde_json::to_string(&self.columns)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&self.columns)?),
        }
    }
}
