//! Filter on the highest degree held.

use crate::traits::Filter;
use records::{CandidateRecord, MetadataField};
use sources::QueryCriteria;

/// Keeps candidates with at least one degree at or above the required level.
///
/// Degrees outside the known scale count as level 0, so they never
/// satisfy a requirement.
pub struct EducationFilter;

impl Filter for EducationFilter {
    fn name(&self) -> &str {
        "EducationFilter"
    }

    fn is_active(&self, criteria: &QueryCriteria) -> bool {
        criteria.required_education.is_some()
    }

    fn keep(&self, candidate: &CandidateRecord, criteria: &QueryCriteria) -> bool {
        let Some(required) = criteria.required_education else {
            return true;
        };
        !candidate.metadata.is_malformed(MetadataField::Education)
            && candidate.metadata.best_degree_level() >= required.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::{CandidateMetadata, DegreeLevel, EducationEntry};

    fn candidate(id: &str, degrees: &[&str]) -> CandidateRecord {
        let education = degrees
            .iter()
            .map(|degree| EducationEntry {
                institution: "University".to_string(),
                degree: degree.to_string(),
                ..EducationEntry::default()
            })
            .collect();
        CandidateRecord::new(
            id,
            CandidateMetadata {
                education,
                ..CandidateMetadata::default()
            },
        )
    }

    #[test]
    fn test_education_filter() {
        let criteria = QueryCriteria {
            required_education: Some(DegreeLevel::Master),
            ..QueryCriteria::default()
        };
        let candidates = vec![
            candidate("bachelor", &["bachelor"]),
            candidate("phd", &["bachelor", "doctorate"]),
            candidate("master", &["硕士"]),
            candidate("none", &[]),
            candidate("unknown", &["diploma"]),
        ];

        let filtered = EducationFilter.apply(candidates, &criteria).unwrap();
        let ids: Vec<&str> = filtered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["phd", "master"]);
    }

    #[test]
    fn test_malformed_education_is_excluded() {
        let criteria = QueryCriteria {
            required_education: Some(DegreeLevel::Bachelor),
            ..QueryCriteria::default()
        };
        let mut record = candidate("broken", &["doctorate"]);
        record.metadata.malformed.insert(MetadataField::Education);

        let filtered = EducationFilter.apply(vec![record], &criteria).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_no_requirement_keeps_all() {
        let candidates = vec![candidate("none", &[])];
        let filtered = EducationFilter
            .apply(candidates, &QueryCriteria::default())
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
