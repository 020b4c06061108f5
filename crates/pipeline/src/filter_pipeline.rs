//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! eligibility filters together using the builder pattern.

use crate::filters::{EducationFilter, ExperienceFilter, LocationFilter, RequiredItemsFilter};
use crate::traits::Filter;
use anyhow::Result;
use records::CandidateRecord;
use sources::QueryCriteria;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ExperienceFilter)
///     .add_filter(RequiredItemsFilter::skills());
///
/// let eligible = pipeline.apply(candidates, &criteria)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard hard-constraint pipeline, in its fixed order:
    /// experience, education, skills, locations, languages, certifications
    pub fn eligibility() -> Self {
        Self::new()
            .add_filter(ExperienceFilter)
            .add_filter(EducationFilter)
            .add_filter(RequiredItemsFilter::skills())
            .add_filter(LocationFilter)
            .add_filter(RequiredItemsFilter::languages())
            .add_filter(RequiredItemsFilter::certifications())
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// Survivors keep their input order, so the result is always an
    /// order-preserving subset of the input.
    ///
    /// # Arguments
    /// * `candidates` - The ingested candidates to filter
    /// * `criteria` - The criteria supplying the hard constraints
    ///
    /// # Returns
    /// * `Ok(Vec<CandidateRecord>)` - The candidates that pass every active filter
    /// * `Err` - If any filter fails
    ///
    /// Rust concept: `candidates` is taken by value, so each filter consumes
    /// the previous stage's vector instead of cloning records.
    pub fn apply(
        &self,
        candidates: Vec<CandidateRecord>,
        criteria: &QueryCriteria,
    ) -> Result<Vec<CandidateRecord>> {
        let input_count = candidates.len();
        let mut current = candidates;
        for filter in &self.filters {
            if !filter.is_active(criteria) {
                continue;
            }
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, criteria)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        tracing::info!("Filtered candidates from {} to {}", input_count, current.len());
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::{CandidateMetadata, WorkEntry};

    fn candidate(id: &str, skills: &[&str], years: i32) -> CandidateRecord {
        let metadata = CandidateMetadata {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            work_history: vec![WorkEntry {
                company: "Acme".to_string(),
                start_date: "2010-01".to_string(),
                end_date: format!("{}-01", 2010 + years),
                ..WorkEntry::default()
            }],
            ..CandidateMetadata::default()
        };
        CandidateRecord::new(id, metadata)
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let candidates = vec![candidate("a", &[], 1), candidate("b", &[], 2)];

        let filtered = pipeline.apply(candidates, &QueryCriteria::default()).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_eligibility_order() {
        let pipeline = FilterPipeline::eligibility();
        assert_eq!(
            pipeline.filter_names(),
            vec![
                "ExperienceFilter",
                "EducationFilter",
                "SkillsFilter",
                "LocationFilter",
                "LanguagesFilter",
                "CertificationsFilter",
            ]
        );
    }

    #[test]
    fn test_unconstrained_criteria_keep_everyone() {
        let candidates = vec![candidate("a", &[], 0), candidate("b", &["Go"], 5)];
        let filtered = FilterPipeline::eligibility()
            .apply(candidates.clone(), &QueryCriteria::default())
            .unwrap();
        assert_eq!(filtered, candidates);
    }

    #[test]
    fn test_filters_compose_in_order() {
        let criteria = QueryCriteria {
            min_experience_years: Some(3),
            required_skills: vec!["python".to_string()],
            ..QueryCriteria::default()
        };
        let candidates = vec![
            candidate("junior-py", &["Python"], 1),
            candidate("senior-py", &["Python", "SQL"], 6),
            candidate("senior-go", &["Go"], 8),
            candidate("mid-py", &["PYTHON"], 3),
        ];

        let filtered = FilterPipeline::eligibility().apply(candidates, &criteria).unwrap();
        let ids: Vec<&str> = filtered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["senior-py", "mid-py"]);
    }
}
