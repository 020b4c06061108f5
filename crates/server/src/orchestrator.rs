//! # Screening Orchestrator
//!
//! This module coordinates one screening run end to end:
//! 1. Retrieve candidates for the criteria
//! 2. Ingest raw hits into typed records
//! 3. Apply the eligibility filters
//! 4. Score and rank the survivors
//! 5. Cut by minimum score and top-N
//! 6. Attach narrative analyses concurrently
//! 7. Aggregate into a report
//!
//! Retrieval and the CPU-bound stages run on the blocking pool; only the
//! analyst calls are awaited as plain async work.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use pipeline::{
    FilterPipeline, RankedCandidate, ScreeningReport, Scorer, filter_by_threshold, rank, top_n,
};
use records::{CandidateRecord, RetrievalHit, ingest};
use sources::{CandidateSource, QueryCriteria};

use crate::analyst::{ANALYSIS_UNAVAILABLE, Analyst};

/// Per-run knobs for [`ScreeningOrchestrator::screen`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningOptions {
    /// Maximum number of hits requested from the source
    pub limit: usize,
    /// Keep only the best N after ranking
    pub top_n: Option<usize>,
    /// Drop candidates whose overall score is below this
    pub min_score: Option<f64>,
    /// Run the analyst on every reported candidate
    pub analyze: bool,
}

impl Default for ScreeningOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            top_n: None,
            min_score: None,
            analyze: false,
        }
    }
}

impl ScreeningOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn with_analysis(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }
}

/// Main orchestrator that coordinates the screening pipeline
pub struct ScreeningOrchestrator<S, A> {
    source: Arc<S>,
    analyst: Arc<A>,
    filter_pipeline: Arc<FilterPipeline>,
    scorer: Scorer,
}

impl<S, A> Clone for ScreeningOrchestrator<S, A> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            analyst: Arc::clone(&self.analyst),
            filter_pipeline: Arc::clone(&self.filter_pipeline),
            scorer: self.scorer.clone(),
        }
    }
}

impl<S, A> ScreeningOrchestrator<S, A>
where
    S: CandidateSource + 'static,
    A: Analyst,
{
    /// Create an orchestrator with the standard eligibility filters and
    /// default scoring weights
    pub fn new(source: Arc<S>, analyst: Arc<A>) -> Self {
        Self {
            source,
            analyst,
            filter_pipeline: Arc::new(FilterPipeline::eligibility()),
            scorer: Scorer::new(),
        }
    }

    /// Main entry point: screen candidates against the criteria
    ///
    /// # Arguments
    /// * `criteria` - Normalized hiring criteria
    /// * `options` - Retrieval limit, result cuts and whether to analyze
    ///
    /// # Returns
    /// A report presenting the candidates that survive the cuts, in rank
    /// order. `total_candidates` and `summary` cover every ranked candidate,
    /// so they do not change with `top_n` or `min_score`.
    ///
    /// Rust concept: the CPU-bound stages own clones of their inputs so they
    /// can move onto the blocking pool; the `Arc` fields make those clones cheap.
    pub async fn screen(
        &self,
        criteria: &QueryCriteria,
        options: &ScreeningOptions,
    ) -> Result<ScreeningReport> {
        let start_time = Instant::now();
        info!(
            "Screening with {} against: {}",
            self.source.name(),
            criteria.to_query_text()
        );

        let hits = self.retrieve(criteria, options.limit).await?;
        info!("Retrieved {} hits", hits.len());

        let ranked = self.evaluate(hits, criteria).await?;
        info!("Ranked {} eligible candidates", ranked.len());

        let mut selected = self.select(&ranked, options);
        info!("Selected {} candidates for the report", selected.len());

        if options.analyze {
            self.attach_analyses(&mut selected, criteria).await;
        }

        let report = ScreeningReport::build_selected(criteria, &ranked, &selected);
        info!(
            "Screening finished in {:.2?}: {} of {} candidates reported, top score {:.2}",
            start_time.elapsed(),
            report.candidates.len(),
            report.total_candidates,
            report.summary.maximum
        );
        Ok(report)
    }

    /// Query the candidate source on the blocking pool
    async fn retrieve(&self, criteria: &QueryCriteria, limit: usize) -> Result<Vec<RetrievalHit>> {
        let source = Arc::clone(&self.source);
        let criteria = criteria.clone();
        tokio::task::spawn_blocking(move || source.retrieve(&criteria, limit))
            .await
            .context("Retrieval task panicked")?
            .context("Failed to retrieve candidates")
    }

    /// Ingest, filter, score and rank on the blocking pool
    async fn evaluate(
        &self,
        hits: Vec<RetrievalHit>,
        criteria: &QueryCriteria,
    ) -> Result<Vec<RankedCandidate>> {
        let filter_pipeline = Arc::clone(&self.filter_pipeline);
        let scorer = self.scorer.clone();
        let criteria = criteria.clone();

        tokio::task::spawn_blocking(move || -> Result<Vec<RankedCandidate>> {
            let records: Vec<CandidateRecord> = ingest(hits);
            let eligible = filter_pipeline
                .apply(records, &criteria)
                .context("Failed to apply filters")?;
            let scored = scorer.score(eligible, &criteria);
            Ok(rank(scored))
        })
        .await
        .context("Evaluation task panicked")?
    }

    /// Threshold first, then the top-N prefix; ranks are kept as assigned
    fn select(&self, ranked: &[RankedCandidate], options: &ScreeningOptions) -> Vec<RankedCandidate> {
        let kept = match options.min_score {
            Some(threshold) => filter_by_threshold(ranked, threshold),
            None => ranked.to_vec(),
        };
        match options.top_n {
            Some(n) => top_n(&kept, n).to_vec(),
            None => kept,
        }
    }

    /// Run the analyst for every candidate concurrently.
    ///
    /// A failed or panicked call only affects its own candidate, which gets
    /// the fixed unavailable text.
    async fn attach_analyses(&self, candidates: &mut [RankedCandidate], criteria: &QueryCriteria) {
        let criteria = Arc::new(criteria.clone());
        let handles: Vec<_> = candidates
            .iter()
            .map(|candidate| {
                let analyst = Arc::clone(&self.analyst);
                let criteria = Arc::clone(&criteria);
                let candidate = candidate.clone();
                tokio::spawn(async move { analyst.analyze(&candidate, &criteria).await })
            })
            .collect();

        for (candidate, handle) in candidates.iter_mut().zip(handles) {
            let analysis = match handle.await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!(
                        "{} failed for candidate {}: {:#}",
                        self.analyst.name(),
                        candidate.record.id,
                        e
                    );
                    ANALYSIS_UNAVAILABLE.to_string()
                }
                Err(e) => {
                    warn!("Analysis task for candidate {} panicked: {}", candidate.record.id, e);
                    ANALYSIS_UNAVAILABLE.to_string()
                }
            };
            candidate.analysis = Some(analysis);
        }
    }
}
