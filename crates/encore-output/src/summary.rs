//! Run summary.
//!
//! Aggregates a ranked run into the figures reported after every match run:
//! score distribution, tier counts, each artist's best match, how strongly
//! each component moves with the composite, and which profiles were turned
//! away before scoring.

use crate::export::{ExportError, ExportFormat, Exporter};
use chrono::{DateTime, Utc};
use encore_data::ProfileKind;
use encore_rank::{MatchScore, MatchTier, RankedMatches};
use encore_scoring::{ComponentScores, mean, pearson, sample_std};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A profile excluded from the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectionRecord {
    /// Artist or brand.
    pub kind: ProfileKind,

    /// Profile identifier.
    pub id: String,

    /// Why the profile was excluded.
    pub reason: String,
}

impl RejectionRecord {
    /// Create a new rejection record.
    pub fn new(kind: ProfileKind, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Best match of one artist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopMatch {
    /// Artist display name.
    pub artist_name: String,

    /// Brand display name.
    pub brand_name: String,

    /// Composite score (0-100).
    pub score: f64,

    /// Tier of the match.
    pub tier: Option<MatchTier>,
}

impl From<&MatchScore> for TopMatch {
    fn from(score: &MatchScore) -> Self {
        Self {
            artist_name: score.artist_name().to_string(),
            brand_name: score.brand_name().to_string(),
            score: score.composite_score().unwrap_or_default(),
            tier: score.tier(),
        }
    }
}

const COMPONENTS: [&str; 4] = ["demographic", "attribute", "geographic", "industry_affinity"];

const fn component_values(c: &ComponentScores) -> [f64; 4] {
    [c.demographic, c.attribute, c.geographic, c.industry_affinity]
}

/// Aggregate figures for one match run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// When the summary was produced.
    pub generated_at: DateTime<Utc>,

    /// Artists with at least one match row.
    pub artists: usize,

    /// Match rows, scored or not.
    pub total_matches: usize,

    /// Rows with a composite score.
    pub scored_matches: usize,

    /// Mean composite score.
    pub mean_score: Option<f64>,

    /// Sample standard deviation of composite scores.
    pub std_dev: Option<f64>,

    /// Highest composite score.
    pub max_score: Option<f64>,

    /// Lowest composite score.
    pub min_score: Option<f64>,

    /// Scored rows per tier.
    pub tier_counts: BTreeMap<MatchTier, usize>,

    /// Best match of each artist, in artist order.
    pub top_matches: Vec<TopMatch>,

    /// Pearson correlation of each component with the composite score.
    pub component_correlations: BTreeMap<String, Option<f64>>,

    /// Profiles excluded before scoring.
    pub rejections: Vec<RejectionRecord>,

    /// Brands removed by the media-spend pre-filter.
    pub filtered_brands: usize,
}

impl RunSummary {
    /// Summarize a ranked run.
    pub fn new(
        ranked: &[RankedMatches],
        rejections: Vec<RejectionRecord>,
        filtered_brands: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let all: Vec<&MatchScore> = ranked.iter().flat_map(|a| a.matches()).collect();
        let scored: Vec<&MatchScore> = all.iter().copied().filter(|m| m.is_scored()).collect();
        let scores: Vec<f64> = scored.iter().filter_map(|m| m.composite_score()).collect();

        let mut tier_counts: BTreeMap<MatchTier, usize> =
            MatchTier::ALL.iter().map(|&tier| (tier, 0)).collect();
        for tier in scored.iter().filter_map(|m| m.tier()) {
            *tier_counts.entry(tier).or_default() += 1;
        }

        let rows: Vec<[f64; 4]> = scored
            .iter()
            .filter_map(|m| m.components().map(component_values))
            .collect();
        let component_correlations = COMPONENTS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<f64> = rows.iter().map(|row| row[i]).collect();
                ((*name).to_string(), pearson(&values, &scores))
            })
            .collect();

        Self {
            generated_at,
            artists: ranked.len(),
            total_matches: all.len(),
            scored_matches: scores.len(),
            mean_score: mean(&scores),
            std_dev: (!scores.is_empty()).then(|| sample_std(&scores)),
            max_score: scores.iter().copied().reduce(f64::max),
            min_score: scores.iter().copied().reduce(f64::min),
            tier_counts,
            top_matches: ranked.iter().filter_map(|a| a.best()).map(TopMatch::from).collect(),
            component_correlations,
            rejections,
            filtered_brands,
        }
    }

    /// Rows that could not be scored.
    pub const fn unscored_matches(&self) -> usize {
        self.total_matches - self.scored_matches
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let fmt_opt = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));

        output.push_str("\nMatch Run Summary\n");
        output.push_str(&format!("Generated: {}\n", self.generated_at.to_rfc3339()));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nScores:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("  Artists:                  {}\n", self.artists));
        output.push_str(&format!("  Total Matches:            {}\n", self.total_matches));
        output.push_str(&format!(
            "  Scored Matches:           {} ({} unscored)\n",
            self.scored_matches,
            self.unscored_matches()
        ));
        output.push_str(&format!("  Mean Score:               {}\n", fmt_opt(self.mean_score)));
        output.push_str(&format!("  Std Dev:                  {}\n", fmt_opt(self.std_dev)));
        output.push_str(&format!("  Max Score:                {}\n", fmt_opt(self.max_score)));
        output.push_str(&format!("  Min Score:                {}\n", fmt_opt(self.min_score)));
        output.push_str(&format!("  Filtered Brands:          {}\n", self.filtered_brands));
        output.push_str(&format!("  Rejected Profiles:        {}\n", self.rejections.len()));

        output.push_str("\nTiers:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for (tier, count) in &self.tier_counts {
            output.push_str(&format!("  {:<26}{}\n", format!("{tier}:"), count));
        }

        output.push_str("\nComponent Correlation with Composite:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for (component, correlation) in &self.component_correlations {
            output.push_str(&format!(
                "  {:<26}{}\n",
                format!("{component}:"),
                correlation.map_or_else(|| "-".to_string(), |r| format!("{r:.3}"))
            ));
        }

        if !self.top_matches.is_empty() {
            output.push_str("\nTop Match per Artist:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<28} {:<28} {:>10} {:>11}\n",
                "Artist", "Brand", "Score", "Tier"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for top in &self.top_matches {
                output.push_str(&format!(
                    "{:<28} {:<28} {:>10.2} {:>11}\n",
                    top.artist_name,
                    top.brand_name,
                    top.score,
                    top.tier.map_or("-", |t| t.name())
                ));
            }
        }

        if !self.rejections.is_empty() {
            output.push_str("\nRejected Profiles:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for rejection in &self.rejections {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    rejection.kind, rejection.id, rejection.reason
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}

#[derive(Serialize)]
struct MetricRow {
    #[serde(rename = "Metric")]
    metric: String,
    #[serde(rename = "Value")]
    value: String,
}

impl Exporter for RunSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Csv => {
                let opt = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
                let mut rows = vec![
                    ("generated_at".to_string(), self.generated_at.to_rfc3339()),
                    ("artists".to_string(), self.artists.to_string()),
                    ("total_matches".to_string(), self.total_matches.to_string()),
                    ("scored_matches".to_string(), self.scored_matches.to_string()),
                    ("mean_score".to_string(), opt(self.mean_score)),
                    ("std_dev".to_string(), opt(self.std_dev)),
                    ("max_score".to_string(), opt(self.max_score)),
                    ("min_score".to_string(), opt(self.min_score)),
                    ("filtered_brands".to_string(), self.filtered_brands.to_string()),
                    ("rejections".to_string(), self.rejections.len().to_string()),
                ];
                for (tier, count) in &self.tier_counts {
                    rows.push((format!("tier_{}", tier.name().to_lowercase()), count.to_string()));
                }
                for (component, correlation) in &self.component_correlations {
                    rows.push((format!("corr_{component}"), opt(*correlation)));
                }
                let records: Vec<MetricRow> = rows
                    .into_iter()
                    .map(|(metric, value)| MetricRow { metric, value })
                    .collect();
                crate::export::write_csv(&records)
            }
        }
    }
}
