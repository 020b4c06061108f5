//! Result aggregation and presentation.
//!
//! Turns a ranked list into the externally facing shape: summary statistics,
//! one [`CandidateView`] per candidate, and a plain-text rendering.

use crate::ranker::RankedCandidate;
use crate::scoring::ScoreVector;
use anyhow::{Context, Result};
use records::CandidateId;
use serde::Serialize;
use sources::QueryCriteria;
use std::fmt;
use tracing::warn;

// =============================================================================
// Summary
// =============================================================================

/// Overall-score statistics for one screening run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScreeningSummary {
    #[serde(rename = "average_score")]
    pub average: f64,
    #[serde(rename = "top_score")]
    pub maximum: f64,
    #[serde(rename = "bottom_score")]
    pub minimum: f64,
}

/// Mean, max and min overall score; all zero for an empty list
pub fn aggregate(ranked: &[RankedCandidate]) -> ScreeningSummary {
    if ranked.is_empty() {
        return ScreeningSummary::default();
    }
    let scores = ranked.iter().map(RankedCandidate::overall);
    let total: f64 = scores.clone().sum();
    ScreeningSummary {
        average: total / ranked.len() as f64,
        maximum: scores.clone().fold(f64::MIN, f64::max),
        minimum: scores.fold(f64::MAX, f64::min),
    }
}

// =============================================================================
// Candidate view
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Candidate metadata in transport form.
///
/// Flat lists stay sequences; structured lists are re-encoded as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub skills: Vec<String>,
    pub expected_salary: Option<String>,
    pub preferred_locations: Vec<String>,
    pub work_experience: String,
    pub education: String,
    pub projects: String,
    pub languages: String,
    pub certifications: String,
}

/// One ranked candidate as returned to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateView {
    pub id: CandidateId,
    pub rank: usize,
    pub name: Option<String>,
    pub scores: ScoreVector,
    pub analysis: Option<String>,
    pub contact_info: ContactInfo,
    pub basic_info: BasicInfo,
    pub distance: Option<f64>,
}

/// Shape a ranked candidate for the presentation layer
pub fn present(candidate: &RankedCandidate) -> CandidateView {
    let metadata = &candidate.record.metadata;
    CandidateView {
        id: candidate.record.id.clone(),
        rank: candidate.rank,
        name: metadata.name.clone(),
        scores: candidate.scores,
        analysis: candidate.analysis.clone(),
        contact_info: ContactInfo {
            email: metadata.email.clone(),
            phone: metadata.phone.clone(),
        },
        basic_info: BasicInfo {
            skills: metadata.skills.clone(),
            expected_salary: metadata.expected_salary.clone(),
            preferred_locations: metadata.preferred_locations.clone(),
            work_experience: encode_list(&candidate.record.id, &metadata.work_history),
            education: encode_list(&candidate.record.id, &metadata.education),
            projects: encode_list(&candidate.record.id, &metadata.projects),
            languages: encode_list(&candidate.record.id, &metadata.languages),
            certifications: encode_list(&candidate.record.id, &metadata.certifications),
        },
        distance: candidate.record.distance,
    }
}

/// JSON text of a list, empty text if it cannot be encoded
fn encode_list<T: Serialize>(id: &str, items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|e| {
        warn!("Candidate {}: could not encode list field: {}", id, e);
        String::new()
    })
}

// =============================================================================
// Report
// =============================================================================

/// Complete result of one screening run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub query: QueryCriteria,
    pub total_candidates: usize,
    pub candidates: Vec<CandidateView>,
    pub summary: ScreeningSummary,
}

impl ScreeningReport {
    /// Report every ranked candidate
    pub fn build(criteria: &QueryCriteria, ranked: &[RankedCandidate]) -> Self {
        Self::build_selected(criteria, ranked, ranked)
    }

    /// Report a cut of a ranking.
    ///
    /// # Arguments
    /// * `criteria` - The criteria the run was screened against
    /// * `ranked` - Every ranked candidate of the run
    /// * `selected` - The candidates to present, usually a threshold or
    ///   top-N cut of `ranked`
    ///
    /// # Returns
    /// A report whose `total_candidates` and `summary` describe the whole
    /// ranking while `candidates` holds views of `selected` only.
    pub fn build_selected(
        criteria: &QueryCriteria,
        ranked: &[RankedCandidate],
        selected: &[RankedCandidate],
    ) -> Self {
        Self {
            query: criteria.clone(),
            total_candidates: ranked.len(),
            candidates: selected.iter().map(present).collect(),
            summary: aggregate(ranked),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to encode screening report")
    }
}

impl fmt::Display for ScreeningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Candidate Screening Report")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f)?;

        writeln!(f, "Query conditions:")?;
        for condition in self.query.conditions() {
            writeln!(f, "  {}", condition)?;
        }
        writeln!(f)?;

        writeln!(f, "Total candidates: {}", self.total_candidates)?;
        writeln!(f)?;
        for candidate in &self.candidates {
            let info = &candidate.basic_info;
            writeln!(
                f,
                "Candidate {}: {}",
                candidate.rank,
                candidate.name.as_deref().unwrap_or("unknown")
            )?;
            writeln!(f, "  Overall score: {:.2}", candidate.scores.overall)?;
            writeln!(f, "  Skills: {}", info.skills.join(", "))?;
            writeln!(
                f,
                "  Expected salary: {}",
                info.expected_salary.as_deref().unwrap_or("unknown")
            )?;
            writeln!(f, "  Preferred locations: {}", info.preferred_locations.join(", "))?;
            writeln!(
                f,
                "  Analysis:\n{}",
                candidate.analysis.as_deref().unwrap_or("none")
            )?;
            writeln!(f)?;
        }

        writeln!(f, "Summary:")?;
        writeln!(f, "  Average score: {:.2}", self.summary.average)?;
        writeln!(f, "  Top score: {:.2}", self.summary.maximum)?;
        write!(f, "  Bottom score: {:.2}", self.summary.minimum)
    }
}
