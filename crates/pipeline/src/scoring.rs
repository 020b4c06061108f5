//! Multi-dimensional scoring of eligible candidates.
//!
//! Six independent dimensions are computed per candidate, each in [0, 1],
//! and combined with fixed weights into one overall score. A dimension whose
//! criteria field is absent gives full credit.

use crate::ranker::ScoredCandidate;
use rayon::prelude::*;
use records::{CandidateMetadata, CandidateRecord};
use serde::{Deserialize, Serialize};
use sources::QueryCriteria;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, warn};

// =============================================================================
// Score vector and weights
// =============================================================================

/// Per-candidate dimension scores plus the weighted overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    #[serde(rename = "skill_score")]
    pub skill: f64,
    #[serde(rename = "industry_score")]
    pub industry: f64,
    #[serde(rename = "salary_score")]
    pub salary: f64,
    #[serde(rename = "education_score")]
    pub education: f64,
    #[serde(rename = "location_score")]
    pub location: f64,
    #[serde(rename = "tag_score")]
    pub affinity: f64,
    #[serde(rename = "overall_score")]
    pub overall: f64,
}

/// Weight of each dimension in the overall score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skill: f64,
    pub industry: f64,
    pub salary: f64,
    pub education: f64,
    pub location: f64,
    pub affinity: f64,
}

impl ScoringWeights {
    pub const DEFAULT: ScoringWeights = ScoringWeights {
        skill: 0.30,
        industry: 0.20,
        salary: 0.10,
        education: 0.10,
        location: 0.20,
        affinity: 0.10,
    };

    pub fn sum(&self) -> f64 {
        self.skill + self.industry + self.salary + self.education + self.location + self.affinity
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// Scorer
// =============================================================================

/// Attaches a [`ScoreVector`] to every candidate.
///
/// Does not filter or sort; the ranker orders the result.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score all candidates in parallel, in input order
    ///
    /// # Arguments
    /// * `candidates` - Eligible candidates, consumed into the result
    /// * `criteria` - The criteria each dimension is measured against
    ///
    /// # Returns
    /// One [`ScoredCandidate`] per input candidate. Every dimension and the
    /// overall score lie in [0, 1].
    ///
    /// Rust concept: `into_par_iter` moves each record into a rayon worker;
    /// `collect` reassembles the results in input order.
    pub fn score(
        &self,
        candidates: Vec<CandidateRecord>,
        criteria: &QueryCriteria,
    ) -> Vec<ScoredCandidate> {
        let scored: Vec<ScoredCandidate> = candidates
            .into_par_iter()
            .map(|record| {
                let scores = self.score_single(&record.metadata, criteria);
                ScoredCandidate { record, scores }
            })
            .collect();
        debug!("Scored {} candidates", scored.len());
        scored
    }

    /// Compute the score vector for one candidate.
    pub fn score_single(&self, metadata: &CandidateMetadata, criteria: &QueryCriteria) -> ScoreVector {
        let skill = unit(skill_score(metadata, criteria));
        let industry = unit(industry_score(metadata, criteria));
        let salary = unit(salary_score(metadata, criteria));
        let education = unit(education_score(metadata, criteria));
        let location = unit(location_score(metadata, criteria));
        let affinity = unit(affinity_score(metadata, criteria));

        let w = &self.weights;
        let overall = skill * w.skill
            + industry * w.industry
            + salary * w.salary
            + education * w.education
            + location * w.location
            + affinity * w.affinity;

        ScoreVector {
            skill,
            industry,
            salary,
            education,
            location,
            affinity,
            overall: unit(overall),
        }
    }
}

/// Clamp into [0, 1]; NaN becomes 0
fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

// =============================================================================
// Dimensions
// =============================================================================

/// `0.8 * required match + 0.2 * preferred match`, case-insensitive
pub fn skill_score(metadata: &CandidateMetadata, criteria: &QueryCriteria) -> f64 {
    let held = lowercase_set(metadata.skills.iter());
    weighted_match(&held, &criteria.required_skills, &criteria.preferred_skills)
}

/// Same two-term formula over employer names.
///
/// Company names stand in for industries since no industry taxonomy is
/// available; a requested industry only matches a company of that name.
pub fn industry_score(metadata: &CandidateMetadata, criteria: &QueryCriteria) -> f64 {
    let companies = lowercase_set(
        metadata
            .work_history
            .iter()
            .map(|entry| &entry.company)
            .filter(|company| !company.is_empty()),
    );
    weighted_match(
        &companies,
        &criteria.required_industries,
        &criteria.preferred_industries,
    )
}

/// Fit of the candidate's expected salary inside the requested range.
///
/// - either side absent: 1.0
/// - expectation fully inside the range: 1.0
/// - partial overlap: overlap length over expectation length
/// - disjoint: 0.0
/// - unparsable salary text: 0.5
pub fn salary_score(metadata: &CandidateMetadata, criteria: &QueryCriteria) -> f64 {
    let (Some(range), Some(expected)) = (&criteria.salary_range, &metadata.expected_salary) else {
        return 1.0;
    };
    let requested = format!(
        "{}-{}",
        range.min.as_deref().unwrap_or("0K"),
        range.max.as_deref().unwrap_or("1000K")
    );

    match (parse_salary(expected), parse_salary(&requested)) {
        (Some(expected), Some(requested)) => salary_overlap(expected, requested),
        _ => {
            warn!(
                "Unparsable salary (expected {:?}, requested {:?}), using neutral score",
                expected, requested
            );
            0.5
        }
    }
}

fn salary_overlap((expected_min, expected_max): (f64, f64), (range_min, range_max): (f64, f64)) -> f64 {
    if expected_min >= range_min && expected_max <= range_max {
        return 1.0;
    }
    let overlap_min = expected_min.max(range_min);
    let overlap_max = expected_max.min(range_max);
    if overlap_min < overlap_max {
        let expected_span = expected_max - expected_min;
        if expected_span > 0.0 {
            return ((overlap_max - overlap_min) / expected_span).min(1.0);
        }
    }
    0.0
}

/// Parse a salary string into a `(min, max)` range in currency units.
///
/// Example: "20K-30K" -> Some((20000.0, 30000.0))
///          "25k"     -> Some((25000.0, 25000.0))
///          "面议"     -> Some((0.0, 1000000.0))   no number given
///          "abc-30K" -> None                   malformed number
pub fn parse_salary(text: &str) -> Option<(f64, f64)> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if compact.contains('-') {
        let mut parts = compact.split('-');
        let min = parse_thousands(parts.next()?)?;
        let max = parse_thousands(parts.next()?)?;
        return Some((min, max));
    }
    if compact.contains('k') {
        let value = parse_thousands(&compact)?;
        return Some((value, value));
    }
    Some((0.0, 1_000_000.0))
}

fn parse_thousands(part: &str) -> Option<f64> {
    let value = part.replace('k', "").parse::<f64>().ok()? * 1000.0;
    value.is_finite().then_some(value)
}

/// Ordinal ratio of the best held degree to the required one
pub fn education_score(metadata: &CandidateMetadata, criteria: &QueryCriteria) -> f64 {
    let Some(required) = criteria.required_education else {
        return 1.0;
    };
    let best = metadata.best_degree_level();
    if best >= required.rank() {
        1.0
    } else {
        f64::from(best) / f64::from(required.rank())
    }
}

/// Jaccard similarity of preferred and requested locations, case-sensitive
pub fn location_score(metadata: &CandidateMetadata, criteria: &QueryCriteria) -> f64 {
    if criteria.locations.is_empty() {
        return 1.0;
    }
    let preferred: HashSet<&str> = metadata.preferred_locations.iter().map(String::as_str).collect();
    let requested: HashSet<&str> = criteria.locations.iter().map(String::as_str).collect();
    jaccard(&preferred, &requested)
}

/// Jaccard similarity of summary words and query keywords, lowercased
pub fn affinity_score(metadata: &CandidateMetadata, criteria: &QueryCriteria) -> f64 {
    if criteria.keywords.is_empty() {
        return 1.0;
    }
    let summary: HashSet<String> = metadata
        .summary
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let keywords = lowercase_set(criteria.keywords.iter());
    jaccard(&summary, &keywords)
}

// =============================================================================
// Set helpers
// =============================================================================

fn lowercase_set<'a>(items: impl Iterator<Item = &'a String>) -> HashSet<String> {
    items.map(|item| item.to_lowercase()).collect()
}

fn weighted_match(held: &HashSet<String>, required: &[String], preferred: &[String]) -> f64 {
    let required = lowercase_set(required.iter());
    let preferred = lowercase_set(preferred.iter());
    if required.is_empty() && preferred.is_empty() {
        return 1.0;
    }
    let fraction = |wanted: &HashSet<String>| {
        if wanted.is_empty() {
            0.0
        } else {
            wanted.intersection(held).count() as f64 / wanted.len() as f64
        }
    };
    (0.8 * fraction(&required) + 0.2 * fraction(&preferred)).min(1.0)
}

/// |A ∩ B| / |A ∪ B|, 1.0 when both are empty
fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::{DegreeLevel, EducationEntry, WorkEntry};
    use sources::SalaryRange;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn salary_criteria(min: Option<&str>, max: Option<&str>) -> QueryCriteria {
        QueryCriteria {
            salary_range: Some(SalaryRange {
                min: min.map(str::to_string),
                max: max.map(str::to_string),
            }),
            ..QueryCriteria::default()
        }
    }

    fn expecting(salary: &str) -> CandidateMetadata {
        CandidateMetadata {
            expected_salary: Some(salary.to_string()),
            ..CandidateMetadata::default()
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((ScoringWeights::DEFAULT.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_skill_score_scenario() {
        let metadata = CandidateMetadata {
            skills: strings(&["Python", "Django", "MySQL"]),
            ..CandidateMetadata::default()
        };
        let criteria = QueryCriteria {
            required_skills: strings(&["Python", "SQL"]),
            preferred_skills: strings(&["Redis"]),
            ..QueryCriteria::default()
        };
        assert!((skill_score(&metadata, &criteria) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_skill_score_without_requirements() {
        let metadata = CandidateMetadata {
            skills: strings(&["COBOL"]),
            ..CandidateMetadata::default()
        };
        assert_eq!(skill_score(&metadata, &QueryCriteria::default()), 1.0);
    }

    #[test]
    fn test_industry_uses_company_names() {
        let metadata = CandidateMetadata {
            work_history: vec![WorkEntry {
                company: "Alibaba".to_string(),
                ..WorkEntry::default()
            }],
            ..CandidateMetadata::default()
        };
        let criteria = QueryCriteria {
            required_industries: strings(&["alibaba", "E-commerce"]),
            ..QueryCriteria::default()
        };
        assert!((industry_score(&metadata, &criteria) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_salary_contained() {
        let score = salary_score(&expecting("20K-30K"), &salary_criteria(Some("15K"), Some("35K")));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_salary_partial_overlap() {
        let score = salary_score(&expecting("30K-40K"), &salary_criteria(Some("15K"), Some("35K")));
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_salary_disjoint_and_unparsable_differ() {
        let disjoint = salary_score(&expecting("50K-60K"), &salary_criteria(Some("15K"), Some("35K")));
        assert_eq!(disjoint, 0.0);

        let unparsable = salary_score(&expecting("abc-60K"), &salary_criteria(Some("15K"), Some("35K")));
        assert_eq!(unparsable, 0.5);
    }

    #[test]
    fn test_salary_defaults() {
        assert_eq!(salary_score(&CandidateMetadata::default(), &salary_criteria(Some("15K"), None)), 1.0);
        assert_eq!(salary_score(&expecting("20K"), &QueryCriteria::default()), 1.0);
        // Missing upper bound defaults to 1000K
        assert_eq!(salary_score(&expecting("200K-300K"), &salary_criteria(Some("15K"), None)), 1.0);
    }

    #[test]
    fn test_salary_point_outside_range() {
        // Zero-length expectation touching nothing scores 0, not a division error
        let score = salary_score(&expecting("40K"), &salary_criteria(Some("15K"), Some("35K")));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_parse_salary() {
        assert_eq!(parse_salary("20K - 30K"), Some((20000.0, 30000.0)));
        assert_eq!(parse_salary("25k"), Some((25000.0, 25000.0)));
        assert_eq!(parse_salary("negotiable"), Some((0.0, 1_000_000.0)));
        assert_eq!(parse_salary("-30K"), None);
        assert_eq!(parse_salary("infK-30K"), None);
    }

    #[test]
    fn test_education_score_scenario() {
        let metadata = CandidateMetadata {
            education: vec![EducationEntry {
                degree: "master".to_string(),
                ..EducationEntry::default()
            }],
            ..CandidateMetadata::default()
        };
        let criteria = QueryCriteria {
            required_education: Some(DegreeLevel::Doctorate),
            ..QueryCriteria::default()
        };
        assert!((education_score(&metadata, &criteria) - 0.75).abs() < 1e-9);
        assert_eq!(education_score(&CandidateMetadata::default(), &criteria), 0.0);
    }

    #[test]
    fn test_location_jaccard() {
        let metadata = CandidateMetadata {
            preferred_locations: strings(&["Beijing", "Shanghai"]),
            ..CandidateMetadata::default()
        };
        let criteria = QueryCriteria {
            locations: strings(&["Beijing", "Shenzhen"]),
            ..QueryCriteria::default()
        };
        assert!((location_score(&metadata, &criteria) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(location_score(&metadata, &QueryCriteria::default()), 1.0);
    }

    #[test]
    fn test_affinity_score() {
        let metadata = CandidateMetadata {
            summary: Some("Curious Team player".to_string()),
            ..CandidateMetadata::default()
        };
        let criteria = QueryCriteria {
            keywords: strings(&["curious", "mentor"]),
            ..QueryCriteria::default()
        };
        // {curious, team, player} vs {curious, mentor}
        assert!((affinity_score(&metadata, &criteria) - 0.25).abs() < 1e-9);
        assert_eq!(affinity_score(&CandidateMetadata::default(), &criteria), 0.0);
    }

    #[test]
    fn test_unconstrained_candidate_scores_full() {
        let scores = Scorer::new().score_single(&CandidateMetadata::default(), &QueryCriteria::default());
        assert!((scores.overall - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_preserves_order() {
        let records: Vec<CandidateRecord> = (0..20)
            .map(|i| CandidateRecord::new(format!("c{}", i), CandidateMetadata::default()))
            .collect();
        let scored = Scorer::new().score(records, &QueryCriteria::default());
        assert_eq!(scored.len(), 20);
        assert_eq!(scored[7].record.id, "c7");
    }
}
