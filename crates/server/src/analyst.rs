//! Narrative boundary.
//!
//! An [`Analyst`] turns one ranked candidate plus the criteria into a
//! free-text write-up. The orchestrator attaches whatever comes back
//! verbatim; it never parses or edits the text.

use std::collections::HashSet;
use std::fmt::Write;
use std::future::Future;

use anyhow::Result;
use pipeline::RankedCandidate;
use records::{CandidateMetadata, DegreeLevel};
use sources::QueryCriteria;

/// Attached in place of the write-up when an analyst call fails
pub const ANALYSIS_UNAVAILABLE: &str = "analysis unavailable";

/// Produces a narrative evaluation of a ranked candidate
pub trait Analyst: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn analyze(
        &self,
        candidate: &RankedCandidate,
        criteria: &QueryCriteria,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Offline analyst that explains the score vector.
///
/// Deterministic and free of I/O, so local runs and tests get a useful
/// write-up without a text-generation service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBreakdownAnalyst;

impl Analyst for ScoreBreakdownAnalyst {
    fn name(&self) -> &'static str {
        "ScoreBreakdownAnalyst"
    }

    fn analyze(
        &self,
        candidate: &RankedCandidate,
        criteria: &QueryCriteria,
    ) -> impl Future<Output = Result<String>> + Send {
        let text = breakdown(candidate, criteria);
        async move { text }
    }
}

fn breakdown(candidate: &RankedCandidate, criteria: &QueryCriteria) -> Result<String> {
    let metadata = &candidate.record.metadata;
    let s = &candidate.scores;
    let mut out = String::new();

    writeln!(out, "Rank {} with overall score {:.2}", candidate.rank, s.overall)?;
    writeln!(out, "- Skill match: {:.2}", s.skill)?;
    writeln!(out, "- Industry match: {:.2}", s.industry)?;
    writeln!(out, "- Salary fit: {:.2}", s.salary)?;
    writeln!(out, "- Education: {:.2}", s.education)?;
    writeln!(out, "- Location: {:.2}", s.location)?;
    writeln!(out, "- Keyword affinity: {:.2}", s.affinity)?;

    let years = metadata.total_experience_years();
    match criteria.min_experience_years {
        Some(min) if min > 0 => {
            writeln!(out, "Experience: {} years (minimum {})", years, min)?
        }
        _ => writeln!(out, "Experience: {} years", years)?,
    }
    if let Some(required) = criteria.required_education {
        writeln!(
            out,
            "Education: {} (required {})",
            best_degree_label(metadata),
            required
        )?;
    }

    let missing = missing_items(&metadata.skills, &criteria.preferred_skills);
    if !missing.is_empty() {
        writeln!(out, "Missing preferred skills: {}", missing.join(", "))?;
    }
    for field in &metadata.malformed {
        writeln!(out, "Unreadable metadata field: {}", field.key())?;
    }

    write!(out, "Recommendation: {}", recommendation(s.overall))?;
    Ok(out)
}

fn best_degree_label(metadata: &CandidateMetadata) -> String {
    let level = metadata.best_degree_level();
    [
        DegreeLevel::Associate,
        DegreeLevel::Bachelor,
        DegreeLevel::Master,
        DegreeLevel::Doctorate,
    ]
    .into_iter()
    .find(|degree| degree.rank() == level)
    .map(|degree| degree.to_string())
    .unwrap_or_else(|| "unknown".to_string())
}

/// Wanted items the candidate does not list, case-insensitively
fn missing_items<'a>(held: &[String], wanted: &'a [String]) -> Vec<&'a str> {
    let held: HashSet<String> = held.iter().map(|item| item.to_lowercase()).collect();
    wanted
        .iter()
        .filter(|item| !held.contains(&item.to_lowercase()))
        .map(String::as_str)
        .collect()
}

fn recommendation(overall: f64) -> &'static str {
    if overall >= 0.75 {
        "strong match, advance to interview"
    } else if overall >= 0.5 {
        "partial match, consider for interview"
    } else {
        "weak match, hold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{ScoreVector, ScoredCandidate, rank};
    use records::{CandidateRecord, EducationEntry, MetadataField, WorkEntry};

    fn ranked(overall: f64) -> RankedCandidate {
        let metadata = CandidateMetadata {
            name: Some("Alice".to_string()),
            skills: vec!["Rust".to_string(), "sql".to_string()],
            work_history: vec![WorkEntry {
                company: "Acme".to_string(),
                start_date: "2016-01".to_string(),
                end_date: "2022-01".to_string(),
                ..WorkEntry::default()
            }],
            education: vec![EducationEntry {
                degree: "master".to_string(),
                ..EducationEntry::default()
            }],
            ..CandidateMetadata::default()
        };
        let scores = ScoreVector {
            skill: 0.5,
            industry: 1.0,
            salary: 0.5,
            education: 1.0,
            location: 1.0,
            affinity: 0.0,
            overall,
        };
        let mut ranked = rank(vec![ScoredCandidate {
            record: CandidateRecord::new("alice", metadata),
            scores,
        }]);
        ranked.remove(0)
    }

    #[tokio::test]
    async fn test_breakdown_mentions_requirements() {
        let criteria = QueryCriteria {
            preferred_skills: vec!["SQL".to_string(), "Kafka".to_string()],
            min_experience_years: Some(3),
            required_education: Some(DegreeLevel::Bachelor),
            ..QueryCriteria::default()
        };

        let text = ScoreBreakdownAnalyst
            .analyze(&ranked(0.8), &criteria)
            .await
            .unwrap();

        assert!(text.starts_with("Rank 1 with overall score 0.80"));
        assert!(text.contains("Experience: 6 years (minimum 3)"));
        assert!(text.contains("Education: master (required bachelor)"));
        assert!(text.contains("Missing preferred skills: Kafka\n"));
        assert!(text.ends_with("strong match, advance to interview"));
    }

    #[tokio::test]
    async fn test_breakdown_without_requirements() {
        let mut candidate = ranked(0.3);
        candidate.record.metadata.malformed.insert(MetadataField::Languages);

        let text = ScoreBreakdownAnalyst
            .analyze(&candidate, &QueryCriteria::default())
            .await
            .unwrap();

        assert!(text.contains("Experience: 6 years\n"));
        assert!(!text.contains("(required"));
        assert!(!text.contains("Missing preferred skills"));
        assert!(text.contains("Unreadable metadata field: languages"));
        assert!(text.ends_with("weak match, hold"));
    }
}
