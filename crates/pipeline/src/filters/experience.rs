//! Filter on total years of work experience.

use crate::traits::Filter;
use records::{CandidateRecord, MetadataField};
use sources::QueryCriteria;

/// Keeps candidates whose summed experience reaches the required minimum.
///
/// ## Algorithm
/// 1. For each work entry, take `end_year - start_year` using the leading
///    `YYYY-` of each date; entries without one are skipped
/// 2. Sum the spans without deduplicating overlaps
/// 3. Keep if the sum is at least `min_experience_years`
pub struct ExperienceFilter;

impl Filter for ExperienceFilter {
    fn name(&self) -> &str {
        "ExperienceFilter"
    }

    fn is_active(&self, criteria: &QueryCriteria) -> bool {
        criteria.min_experience_years.is_some()
    }

    fn keep(&self, candidate: &CandidateRecord, criteria: &QueryCriteria) -> bool {
        let Some(min_years) = criteria.min_experience_years else {
            return true;
        };
        if candidate.metadata.is_malformed(MetadataField::WorkHistory) {
            return false;
        }
        candidate.metadata.total_experience_years() >= i64::from(min_years)
    }
}
