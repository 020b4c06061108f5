//! Core domain types for candidate screening.
//!
//! Two shapes of the same candidate live here:
//! - [`RetrievalHit`]: what the retrieval collaborator hands over, with an
//!   untyped `metadata` bag that may hold lists, JSON strings or junk
//! - [`CandidateRecord`]: the typed record every pipeline stage consumes
//!
//! The conversion between them lives in [`crate::parser`] and runs exactly
//! once per candidate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a candidate, unique within one screening run
pub type CandidateId = String;

// =============================================================================
// Retrieval boundary
// =============================================================================

/// One result from the semantic retrieval collaborator.
///
/// `metadata` is kept as a raw JSON value because the vector store flattens
/// list fields into JSON-encoded strings and the extractor upstream may omit
/// or mistype any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub id: CandidateId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl RetrievalHit {
    pub fn new(id: impl Into<CandidateId>, text: impl Into<String>, metadata: Value) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
            distance: None,
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

// =============================================================================
// Degree scale
// =============================================================================

/// Ordered degree scale used by both the education filter and the
/// education dimension score.
///
/// Unknown degree labels have no variant; they map to level 0 through
/// [`DegreeLevel::level_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    Associate = 1,
    Bachelor = 2,
    Master = 3,
    Doctorate = 4,
}

impl DegreeLevel {
    /// Ordinal position on the scale (1..=4)
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Parse a degree label, case-insensitively.
    ///
    /// Accepts the English scale names plus the labels the resume
    /// extractor emits for Chinese-language resumes.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "associate" | "大专" => Some(DegreeLevel::Associate),
            "bachelor" | "本科" => Some(DegreeLevel::Bachelor),
            "master" | "硕士" => Some(DegreeLevel::Master),
            "doctorate" | "phd" | "博士" => Some(DegreeLevel::Doctorate),
            _ => None,
        }
    }

    /// Ordinal level of an arbitrary label, 0 when unknown
    pub fn level_of(label: &str) -> u8 {
        Self::parse(label).map_or(0, Self::rank)
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DegreeLevel::Associate => "associate",
            DegreeLevel::Bachelor => "bachelor",
            DegreeLevel::Master => "master",
            DegreeLevel::Doctorate => "doctorate",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Structured metadata entries
// =============================================================================

/// One work-history entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkEntry {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkEntry {
    /// Whole years between the two dates, by leading year only.
    ///
    /// `None` when either date does not start with `YYYY-`. No calendar
    /// arithmetic is attempted and reversed dates give a negative span.
    pub fn span_years(&self) -> Option<i32> {
        Some(leading_year(&self.end_date)? - leading_year(&self.start_date)?)
    }
}

/// One education entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub major: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

impl EducationEntry {
    pub fn level(&self) -> u8 {
        DegreeLevel::level_of(&self.degree)
    }
}

/// Four-digit year at the head of a `YYYY-*` date string.
///
/// Example: "2019-07" -> Some(2019)
///          "Present" -> None
///          "2019"    -> None
pub fn leading_year(date: &str) -> Option<i32> {
    let (head, _) = date.trim().split_once('-')?;
    if head.len() == 4 && head.bytes().all(|b| b.is_ascii_digit()) {
        head.parse().ok()
    } else {
        None
    }
}

// =============================================================================
// Candidate metadata
// =============================================================================

/// List-valued metadata fields that can arrive in the wrong shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Skills,
    WorkHistory,
    Education,
    Projects,
    PreferredLocations,
    Languages,
    Certifications,
}

impl MetadataField {
    pub const ALL: [MetadataField; 7] = [
        MetadataField::Skills,
        MetadataField::WorkHistory,
        MetadataField::Education,
        MetadataField::Projects,
        MetadataField::PreferredLocations,
        MetadataField::Languages,
        MetadataField::Certifications,
    ];

    /// Key of this field in the raw metadata bag
    pub fn key(self) -> &'static str {
        match self {
            MetadataField::Skills => "skills",
            MetadataField::WorkHistory => "work_experience",
            MetadataField::Education => "education",
            MetadataField::Projects => "projects",
            MetadataField::PreferredLocations => "preferred_locations",
            MetadataField::Languages => "languages",
            MetadataField::Certifications => "certifications",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Typed candidate metadata.
///
/// Every list field is always a sequence. Fields that arrived in a shape
/// the coercion layer could not repair are listed in `malformed`; their
/// sequence is empty and hard filters on that field exclude the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub work_history: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    /// Project entries are passed through untouched for presentation
    pub projects: Vec<Value>,
    pub expected_salary: Option<String>,
    pub preferred_locations: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub malformed: BTreeSet<MetadataField>,
}

impl CandidateMetadata {
    pub fn is_malformed(&self, field: MetadataField) -> bool {
        self.malformed.contains(&field)
    }

    /// Sum of per-entry spans; entries with unparsable years are skipped.
    /// Overlapping entries are not deduplicated.
    ///
    /// Spans are widened to `i64` before summing so that a very long
    /// history cannot overflow.
    pub fn total_experience_years(&self) -> i64 {
        self.work_history
            .iter()
            .filter_map(WorkEntry::span_years)
            .map(i64::from)
            .sum()
    }

    /// Highest degree level across education entries, 0 when none is known
    pub fn best_degree_level(&self) -> u8 {
        self.education.iter().map(EducationEntry::level).max().unwrap_or(0)
    }
}

// =============================================================================
// CandidateRecord
// =============================================================================

/// A retrieved candidate after ingestion.
///
/// Constructed once at the retrieval boundary and never mutated afterwards;
/// later stages wrap it rather than edit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    /// Free-text resume excerpt
    pub text: String,
    pub metadata: CandidateMetadata,
    /// Distance reported by the retrieval collaborator, if any
    pub distance: Option<f64>,
}

impl CandidateRecord {
    pub fn new(id: impl Into<CandidateId>, metadata: CandidateMetadata) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            metadata,
            distance: None,
        }
    }
}
