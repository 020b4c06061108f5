//! Core traits for the eligibility pipeline.
//!
//! This module defines the Filter trait that allows composable hard
//! constraints to be applied to candidate sets.

use anyhow::Result;
use rayon::prelude::*;
use records::CandidateRecord;
use sources::QueryCriteria;

/// A hard eligibility constraint.
///
/// ## Design Note
/// - `Send + Sync` lets the default `apply` evaluate candidates on the rayon pool
/// - Filters take ownership of the Vec and return the survivors in input order
/// - A filter whose criteria field is empty is a no-op, never "reject everyone"
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the criteria supply this constraint at all
    fn is_active(&self, criteria: &QueryCriteria) -> bool;

    /// Whether one candidate satisfies the constraint
    fn keep(&self, candidate: &CandidateRecord, criteria: &QueryCriteria) -> bool;

    /// Apply this filter to a set of candidates.
    ///
    /// Evaluated in parallel; rayon's collect keeps the input order.
    fn apply(
        &self,
        candidates: Vec<CandidateRecord>,
        criteria: &QueryCriteria,
    ) -> Result<Vec<CandidateRecord>> {
        if !self.is_active(criteria) {
            return Ok(candidates);
        }
        Ok(candidates
            .into_par_iter()
            .filter(|candidate| self.keep(candidate, criteria))
            .collect())
    }
}
