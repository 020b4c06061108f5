//! Server crate for the resume screening engine.
//!
//! This crate contains the orchestrator that drives one screening run across
//! retrieval, the evaluation pipeline and the narrative analyst.

pub mod analyst;
pub mod orchestrator;

pub use analyst::{ANALYSIS_UNAVAILABLE, Analyst, ScoreBreakdownAnalyst};
pub use orchestrator::{ScreeningOptions, ScreeningOrchestrator};
