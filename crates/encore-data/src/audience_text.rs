//! Parser for the structured audience text export.
//!
//! The artist analytics export is a plain-text block of sections. Each section
//! header sits on its own line and every entry is a label line followed by a
//! value line:
//!
//! ```text
//! Gender
//! Female
//! 62%
//! Age
//! 21-29 Years Old
//! +0.35
//! Consumer Attributes
//! Dog Owners
//! +0.42
//! ```
//!
//! Gender values are audience shares. Values in every other section are
//! signed deviations from the population average; a trailing `%` divides by
//! 100.

use crate::buckets::IndexConvention;
use crate::error::{DataError, Result};
use crate::profile::{ConsumerAttribute, Demographics};

/// Demographics and attributes recovered from an audience text block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAudience {
    /// Demographics in the signed index convention
    pub demographics: Demographics,
    /// Consumer attributes, names lowercased
    pub attributes: Vec<ConsumerAttribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Gender,
    Ethnicity,
    Income,
    Age,
    Attributes,
}

fn section_header(line: &str) -> Option<Section> {
    match line.to_lowercase().as_str() {
        "gender" => Some(Section::Gender),
        "ethnicity" | "race" => Some(Section::Ethnicity),
        "household income" | "income" | "hhi" => Some(Section::Income),
        "age" => Some(Section::Age),
        "consumer attributes" | "attributes" => Some(Section::Attributes),
        _ => None,
    }
}

/// Parse a value line such as `62%`, `+0.35`, `- 12%`.
fn parse_value(line: &str) -> Option<f64> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let (number, percent) = compact
        .strip_suffix('%')
        .map_or((compact.as_str(), false), |rest| (rest, true));
    let digits = number.trim_start_matches(['+', '-']);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    Some(if percent { value / 100.0 } else { value })
}

/// Parse an audience text block.
///
/// Labels without a following value line are skipped. A value line with no
/// label, or a block without any recognised section, is an error.
pub fn parse_audience_text(text: &str) -> Result<ParsedAudience> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut parsed = ParsedAudience::default();
    parsed.demographics.index_convention = IndexConvention::Signed;

    let mut section = None;
    let mut saw_section = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if line.is_empty() {
            continue;
        }
        if let Some(header) = section_header(line) {
            section = Some(header);
            saw_section = true;
            continue;
        }
        let Some(current) = section else {
            continue;
        };
        if parse_value(line).is_some() {
            return Err(DataError::Parse(format!(
                "value '{line}' on line {i} has no label"
            )));
        }
        let Some(value) = lines.get(i).copied().and_then(parse_value) else {
            tracing::debug!(label = line, "audience label without value, skipping");
            continue;
        };
        i += 1;

        let demographics = &mut parsed.demographics;
        match current {
            Section::Gender => {
                let share = if value > 1.0 { value / 100.0 } else { value };
                demographics.gender.insert(line.to_string(), share);
            }
            Section::Ethnicity => {
                demographics.ethnicity.insert(line.to_string(), value);
            }
            Section::Income => {
                demographics.income.insert(line.to_string(), value);
            }
            Section::Age => {
                demographics.age.insert(line.to_string(), value);
            }
            Section::Attributes => {
                parsed
                    .attributes
                    .push(ConsumerAttribute::new(line.to_lowercase(), value));
            }
        }
    }

    if !saw_section {
        return Err(DataError::Parse(
            "no audience sections found in text".to_string(),
        ));
    }
    Ok(parsed)
}
