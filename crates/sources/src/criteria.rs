//! Criteria normalization.
//!
//! The query-understanding collaborator hands over a partially populated
//! [`RawQuery`]: any field may be missing or null. [`normalize`] turns it into
//! a [`QueryCriteria`] where every list is present (possibly empty) and every
//! optional scalar is explicitly `None`, so later stages never null-check.

use anyhow::{Context, Result};
use records::DegreeLevel;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

// =============================================================================
// Raw query
// =============================================================================

/// Hiring query as produced upstream, field presence not guaranteed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawQuery {
    pub keywords: Option<Vec<String>>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub min_experience_years: Option<u32>,
    pub required_education: Option<String>,
    pub required_industries: Option<Vec<String>>,
    pub preferred_industries: Option<Vec<String>>,
    pub salary_range: Option<RawSalaryRange>,
    pub locations: Option<Vec<String>>,
    pub required_languages: Option<Vec<String>>,
    pub required_certifications: Option<Vec<String>>,
    pub custom_conditions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSalaryRange {
    #[serde(default, deserialize_with = "text_or_number")]
    pub min: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub max: Option<String>,
}

impl RawQuery {
    /// Decode a raw query from JSON.
    ///
    /// Missing fields are fine; wrong types (a number where a list belongs,
    /// a negative experience requirement) are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid hiring query")
    }
}

/// Salary bounds are free-form text, but upstream sometimes emits bare numbers
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected salary text or number, found {}",
            other
        ))),
    }
}

// =============================================================================
// Canonical criteria
// =============================================================================

/// Requested salary bounds; a missing side is filled in at scoring time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalaryRange {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Canonical hiring requirements
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryCriteria {
    pub keywords: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub min_experience_years: Option<u32>,
    pub required_education: Option<DegreeLevel>,
    pub required_industries: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub salary_range: Option<SalaryRange>,
    pub locations: Vec<String>,
    pub required_languages: Vec<String>,
    pub required_certifications: Vec<String>,
    pub custom_conditions: Option<String>,
}

/// Convert a raw query into canonical criteria. Never fails.
///
/// List items are trimmed and empty items dropped. An unrecognized
/// education label means no education requirement, and a salary range
/// with neither bound means no salary requirement.
pub fn normalize(raw: RawQuery) -> QueryCriteria {
    let required_education = raw.required_education.as_deref().and_then(|label| {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let level = DegreeLevel::parse(label);
        if level.is_none() {
            warn!("Unknown education level {:?}, ignoring requirement", label);
        }
        level
    });

    let salary_range = raw.salary_range.and_then(|range| {
        let min = clean_text(range.min);
        let max = clean_text(range.max);
        (min.is_some() || max.is_some()).then_some(SalaryRange { min, max })
    });

    QueryCriteria {
        keywords: clean_list(raw.keywords),
        required_skills: clean_list(raw.required_skills),
        preferred_skills: clean_list(raw.preferred_skills),
        min_experience_years: raw.min_experience_years,
        required_education,
        required_industries: clean_list(raw.required_industries),
        preferred_industries: clean_list(raw.preferred_industries),
        salary_range,
        locations: clean_list(raw.locations),
        required_languages: clean_list(raw.required_languages),
        required_certifications: clean_list(raw.required_certifications),
        custom_conditions: clean_text(raw.custom_conditions),
    }
}

fn clean_list(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn push_list(parts: &mut Vec<String>, label: &str, items: &[String]) {
    if !items.is_empty() {
        parts.push(format!("{}: {}", label, items.join(", ")));
    }
}

impl QueryCriteria {
    /// One `label: values` line per populated requirement, in a fixed order
    pub fn conditions(&self) -> Vec<String> {
        let mut parts = Vec::new();
        push_list(&mut parts, "keywords", &self.keywords);
        push_list(&mut parts, "required skills", &self.required_skills);
        push_list(&mut parts, "preferred skills", &self.preferred_skills);
        if let Some(years) = self.min_experience_years.filter(|&y| y > 0) {
            parts.push(format!("minimum experience: {} years", years));
        }
        if let Some(level) = self.required_education {
            parts.push(format!("required education: {}", level));
        }
        push_list(&mut parts, "required industries", &self.required_industries);
        push_list(&mut parts, "preferred industries", &self.preferred_industries);
        if let Some(range) = &self.salary_range {
            parts.push(format!(
                "salary range: {}-{}",
                range.min.as_deref().unwrap_or("?"),
                range.max.as_deref().unwrap_or("?")
            ));
        }
        push_list(&mut parts, "locations", &self.locations);
        push_list(&mut parts, "required languages", &self.required_languages);
        push_list(&mut parts, "required certifications", &self.required_certifications);
        if let Some(custom) = &self.custom_conditions {
            parts.push(format!("other requirements: {}", custom));
        }
        parts
    }

    /// Render the criteria as retrieval query text.
    ///
    /// Example: `keywords: backend; required skills: Rust, SQL; locations: Berlin`
    pub fn to_query_text(&self) -> String {
        let parts = self.conditions();
        if parts.is_empty() {
            return "resume".to_string();
        }
        parts.join("; ")
    }

    /// Every requested term, for lexical matching
    pub fn terms(&self) -> Vec<&str> {
        let lists = [
            &self.keywords,
            &self.required_skills,
            &self.preferred_skills,
            &self.required_industries,
            &self.preferred_industries,
            &self.locations,
            &self.required_languages,
            &self.required_certifications,
        ];
        lists
            .into_iter()
            .flat_map(|items| items.iter().map(String::as_str))
            .chain(self.custom_conditions.as_deref())
            .collect()
    }
}
