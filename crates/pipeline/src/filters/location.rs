//! Filter on preferred work locations.

use crate::traits::Filter;
use records::{CandidateRecord, MetadataField};
use sources::QueryCriteria;

/// Keeps candidates who list at least one requested location.
///
/// Matching is literal and case-sensitive, unlike the skill filters.
pub struct LocationFilter;

impl Filter for LocationFilter {
    fn name(&self) -> &str {
        "LocationFilter"
    }

    fn is_active(&self, criteria: &QueryCriteria) -> bool {
        !criteria.locations.is_empty()
    }

    fn keep(&self, candidate: &CandidateRecord, criteria: &QueryCriteria) -> bool {
        if candidate.metadata.is_malformed(MetadataField::PreferredLocations) {
            return false;
        }
        let preferred = &candidate.metadata.preferred_locations;
        criteria
            .locations
            .iter()
            .any(|location| preferred.contains(location))
    }
}
