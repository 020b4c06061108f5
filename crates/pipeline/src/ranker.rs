//! Deterministic ranking of scored candidates.

use crate::scoring::ScoreVector;
use records::CandidateRecord;
use serde::Serialize;

/// A candidate with its score vector, before ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub record: CandidateRecord,
    pub scores: ScoreVector,
}

/// A scored candidate with its 1-based rank and optional narrative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub record: CandidateRecord,
    pub scores: ScoreVector,
    pub rank: usize,
    pub analysis: Option<String>,
}

impl RankedCandidate {
    pub fn overall(&self) -> f64 {
        self.scores.overall
    }

    /// Attach a narrative write-up, kept verbatim
    pub fn with_analysis(mut self, analysis: impl Into<String>) -> Self {
        self.analysis = Some(analysis.into());
        self
    }
}

/// Sort by overall score descending and assign dense ranks 1..=N.
///
/// The sort is stable: among equal scores the candidate that came first in
/// the input gets the smaller rank. No two candidates share a rank.
///
/// # Arguments
/// * `scored` - Scored candidates in any order
///
/// # Returns
/// The candidates sorted by overall score, highest first, with ranks 1..=N.
///
/// Rust concept: `f64` is only `PartialOrd`, so `total_cmp` supplies the
/// total order `sort_by` needs without unwrapping a comparison.
pub fn rank(mut scored: Vec<ScoredCandidate>) -> Vec<RankedCandidate> {
    scored.sort_by(|a, b| b.scores.overall.total_cmp(&a.scores.overall));

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| RankedCandidate {
            record: candidate.record,
            scores: candidate.scores,
            rank: idx + 1,
            analysis: None,
        })
        .collect()
}

/// The first `n` ranked candidates, without re-sorting
pub fn top_n(ranked: &[RankedCandidate], n: usize) -> &[RankedCandidate] {
    &ranked[..n.min(ranked.len())]
}

/// Candidates whose overall score is at least `threshold`, order preserved
pub fn filter_by_threshold(ranked: &[RankedCandidate], threshold: f64) -> Vec<RankedCandidate> {
    ranked
        .iter()
        .filter(|candidate| candidate.overall() >= threshold)
        .cloned()
        .collect()
}
