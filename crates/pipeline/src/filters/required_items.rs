//! "All required items present" filters for skills, languages and certifications.

use crate::traits::Filter;
use records::{CandidateMetadata, CandidateRecord, MetadataField};
use sources::QueryCriteria;
use std::collections::HashSet;

/// Keeps candidates holding every required item of one list field.
///
/// Comparison is case-insensitive on both sides.
pub struct RequiredItemsFilter {
    name: &'static str,
    field: MetadataField,
    held: fn(&CandidateMetadata) -> &[String],
    required: fn(&QueryCriteria) -> &[String],
}

impl RequiredItemsFilter {
    pub fn skills() -> Self {
        Self {
            name: "SkillsFilter",
            field: MetadataField::Skills,
            held: |m| m.skills.as_slice(),
            required: |c| c.required_skills.as_slice(),
        }
    }

    pub fn languages() -> Self {
        Self {
            name: "LanguagesFilter",
            field: MetadataField::Languages,
            held: |m| m.languages.as_slice(),
            required: |c| c.required_languages.as_slice(),
        }
    }

    pub fn certifications() -> Self {
        Self {
            name: "CertificationsFilter",
            field: MetadataField::Certifications,
            held: |m| m.certifications.as_slice(),
            required: |c| c.required_certifications.as_slice(),
        }
    }
}

impl Filter for RequiredItemsFilter {
    fn name(&self) -> &str {
        self.name
    }

    fn is_active(&self, criteria: &QueryCriteria) -> bool {
        !(self.required)(criteria).is_empty()
    }

    fn keep(&self, candidate: &CandidateRecord, criteria: &QueryCriteria) -> bool {
        if candidate.metadata.is_malformed(self.field) {
            return false;
        }
        let held: HashSet<String> = (self.held)(&candidate.metadata)
            .iter()
            .map(|item| item.to_lowercase())
            .collect();
        (self.required)(criteria)
            .iter()
            .all(|item| held.contains(&item.to_lowercase()))
    }
}
