//! Candidate evaluation pipeline for resume screening.
//!
//! This crate provides:
//! - Filter trait and hard-constraint implementations
//! - FilterPipeline for composing filters
//! - Scorer for the six weighted match dimensions
//! - Ranker, result aggregation and report rendering
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove candidates failing a supplied hard constraint
//! 2. Scorer attaches a score vector to every survivor
//! 3. Ranker sorts by overall score and assigns dense ranks
//! 4. The report module aggregates statistics and shapes the output
//!
//! Every stage is a pure function of its inputs.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{evaluate, ScreeningReport};
//!
//! let ranked = evaluate(records, &criteria)?;
//! let report = ScreeningReport::build(&criteria, &ranked);
//! println!("{}", report);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod ranker;
pub mod report;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use ranker::{RankedCandidate, ScoredCandidate, filter_by_threshold, rank, top_n};
pub use report::{CandidateView, ScreeningReport, ScreeningSummary, aggregate, present};
pub use scoring::{ScoreVector, Scorer, ScoringWeights};
pub use traits::Filter;

use anyhow::Result;
use records::CandidateRecord;
use sources::QueryCriteria;

/// Filter, score and rank ingested candidates against criteria
pub fn evaluate(
    candidates: Vec<CandidateRecord>,
    criteria: &QueryCriteria,
) -> Result<Vec<RankedCandidate>> {
    let eligible = FilterPipeline::eligibility().apply(candidates, criteria)?;
    let scored = Scorer::new().score(eligible, criteria);
    Ok(rank(scored))
}
