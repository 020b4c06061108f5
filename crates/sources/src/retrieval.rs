//! Retrieval boundary.
//!
//! Semantic retrieval is an external collaborator: given criteria it returns
//! an ordered list of [`RetrievalHit`]s. [`CandidateSource`] is the seam the
//! orchestrator depends on.
//!
//! [`LexicalSource`] is a repository-backed stand-in used for local runs and
//! tests. It ranks stored resumes by how many query terms they mention; it is
//! not a semantic index.

use crate::criteria::QueryCriteria;
use anyhow::Result;
use rayon::prelude::*;
use records::{ResumeRepository, RetrievalHit};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A source of retrieved candidates for a query
pub trait CandidateSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Retrieve at most `limit` hits, nearest first
    fn retrieve(&self, criteria: &QueryCriteria, limit: usize) -> Result<Vec<RetrievalHit>>;
}

/// Token-overlap retrieval over a resume repository
pub struct LexicalSource<R> {
    /// Shared, read-only repository
    repository: Arc<R>,

    /// Hits whose overlap ratio is below this are dropped
    min_overlap: f64,
}

impl<R: ResumeRepository> LexicalSource<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            min_overlap: 0.0,
        }
    }

    /// Configure the minimum overlap ratio (default: 0.0, keep everything)
    pub fn with_min_overlap(mut self, min_overlap: f64) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    /// Fraction of query tokens that appear in the hit
    fn overlap(query: &HashSet<String>, hit: &RetrievalHit) -> f64 {
        if query.is_empty() {
            return 0.0;
        }
        let mut document = tokenize(&hit.text);
        collect_text_tokens(&hit.metadata, &mut document);
        let shared = query.iter().filter(|token| document.contains(*token)).count();
        shared as f64 / query.len() as f64
    }
}

impl<R: ResumeRepository> CandidateSource for LexicalSource<R> {
    fn name(&self) -> &'static str {
        "LexicalSource"
    }

    #[instrument(skip(self, criteria))]
    fn retrieve(&self, criteria: &QueryCriteria, limit: usize) -> Result<Vec<RetrievalHit>> {
        let query: HashSet<String> = criteria
            .terms()
            .into_iter()
            .flat_map(tokenize)
            .collect();
        debug!(
            "Matching {} query tokens against {} stored resumes",
            query.len(),
            self.repository.len()
        );

        let mut scored: Vec<(f64, &RetrievalHit)> = self
            .repository
            .all()
            .par_iter()
            .map(|hit| (Self::overlap(&query, hit), hit))
            .filter(|(overlap, _)| *overlap >= self.min_overlap)
            .collect();

        // Stable: equal overlaps keep repository order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        let hits: Vec<RetrievalHit> = scored
            .into_iter()
            .map(|(overlap, hit)| hit.clone().with_distance(1.0 - overlap))
            .collect();
        debug!("Retrieved {} hits", hits.len());
        Ok(hits)
    }
}

/// Lowercased alphanumeric tokens of a text
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens of every string nested anywhere in a metadata value
fn collect_text_tokens(value: &Value, tokens: &mut HashSet<String>) {
    match value {
        Value::String(text) => tokens.extend(tokenize(text)),
        Value::Array(items) => items.iter().for_each(|item| collect_text_tokens(item, tokens)),
        Value::Object(fields) => fields.values().for_each(|item| collect_text_tokens(item, tokens)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::InMemoryRepository;
    use serde_json::json;

    fn create_test_repository() -> Arc<InMemoryRepository> {
        let hits = vec![
            RetrievalHit::new("java-dev", "Java developer in Shanghai", json!({"skills": ["Java", "Spring"]})),
            RetrievalHit::new("py-dev", "Backend engineer", json!({"skills": "Python, Django", "preferred_locations": ["Beijing"]})),
            RetrievalHit::new("py-dev-2", "Python engineer", json!({"preferred_locations": "[\"Beijing\"]"})),
            RetrievalHit::new("designer", "Product designer", json!({"skills": ["Figma"]})),
        ];
        Arc::new(InMemoryRepository::from_hits(hits).unwrap())
    }

    fn criteria(skills: &[&str], locations: &[&str]) -> QueryCriteria {
        QueryCriteria {
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
            ..QueryCriteria::default()
        }
    }

    #[test]
    fn test_orders_by_overlap() {
        let source = LexicalSource::new(create_test_repository());
        let hits = source.retrieve(&criteria(&["Python"], &["Beijing"]), 10).unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["py-dev", "py-dev-2", "java-dev", "designer"]);
        assert_eq!(hits[0].distance, Some(0.0));
        assert_eq!(hits[3].distance, Some(1.0));
    }

    #[test]
    fn test_respects_limit() {
        let source = LexicalSource::new(create_test_repository());
        let hits = source.retrieve(&criteria(&["Java"], &[]), 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "java-dev");
    }

    #[test]
    fn test_min_overlap_drops_unrelated() {
        let source = LexicalSource::new(create_test_repository()).with_min_overlap(0.5);
        let hits = source.retrieve(&criteria(&["Figma"], &[]), 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "designer");
    }

    #[test]
    fn test_empty_criteria_keeps_repository_order() {
        let source = LexicalSource::new(create_test_repository());
        let hits = source.retrieve(&QueryCriteria::default(), 10).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["java-dev", "py-dev", "py-dev-2", "designer"]);
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("C++/Rust, Go!");
        assert!(tokens.contains("rust"));
        assert!(tokens.contains("go"));
        assert!(tokens.contains("c"));
    }
}
