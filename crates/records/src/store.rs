//! Resume repository.
//!
//! Stored resumes are kept as raw [`RetrievalHit`]s: the repository sits on
//! the collaborator side of the retrieval boundary, and ingestion into typed
//! records happens only once a hit is handed to the pipeline.
//!
//! Callers build a repository, then share it read-only (usually behind an
//! `Arc`) with whatever retrieval source serves from it.

use crate::error::{RecordError, Result};
use crate::types::{CandidateId, RetrievalHit};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Storage of resumes keyed by candidate id
pub trait ResumeRepository: Send + Sync {
    /// Store a resume. Ids are unique; a second insert with the same id fails.
    fn insert(&mut self, hit: RetrievalHit) -> Result<()>;

    fn get(&self, id: &str) -> Result<&RetrievalHit>;

    /// Every stored resume, in insertion order
    fn all(&self) -> &[RetrievalHit];

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory repository backed by a vector plus an id index
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    hits: Vec<RetrievalHit>,
    by_id: HashMap<CandidateId, usize>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from hits, rejecting duplicate ids
    pub fn from_hits(hits: impl IntoIterator<Item = RetrievalHit>) -> Result<Self> {
        let mut repository = Self::new();
        for hit in hits {
            repository.insert(hit)?;
        }
        Ok(repository)
    }

    /// Load a JSON array of retrieval hits from disk
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RecordError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let hits: Vec<RetrievalHit> =
            serde_json::from_str(&content).map_err(|source| RecordError::JsonError {
                path: path.display().to_string(),
                source,
            })?;
        let repository = Self::from_hits(hits)?;
        info!("Loaded {} resumes from {:?}", repository.len(), path);
        Ok(repository)
    }
}

impl ResumeRepository for InMemoryRepository {
    fn insert(&mut self, hit: RetrievalHit) -> Result<()> {
        if self.by_id.contains_key(&hit.id) {
            return Err(RecordError::DuplicateId { id: hit.id });
        }
        self.by_id.insert(hit.id.clone(), self.hits.len());
        self.hits.push(hit);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<&RetrievalHit> {
        self.by_id
            .get(id)
            .map(|&idx| &self.hits[idx])
            .ok_or_else(|| RecordError::NotFound { id: id.to_string() })
    }

    fn all(&self) -> &[RetrievalHit] {
        &self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn hit(id: &str) -> RetrievalHit {
        RetrievalHit::new(id, "resume text", json!({"skills": ["Rust"]}))
    }

    #[test]
    fn test_empty_repository() {
        let repository = InMemoryRepository::new();
        assert!(repository.is_empty());
        assert!(matches!(repository.get("missing"), Err(RecordError::NotFound { .. })));
    }

    #[test]
    fn test_insert_and_get() {
        let mut repository = InMemoryRepository::new();
        repository.insert(hit("a")).unwrap();
        repository.insert(hit("b")).unwrap();

        assert_eq!(repository.len(), 2);
        assert_eq!(repository.get("b").unwrap().id, "b");
        let ids: Vec<&str> = repository.all().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"], "Insertion order should be kept");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = InMemoryRepository::from_hits(vec![hit("a"), hit("a")]);
        assert!(matches!(result, Err(RecordError::DuplicateId { id }) if id == "a"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("records-store-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"id": "c1", "text": "backend engineer", "metadata": {{"skills": "Go"}}, "distance": 0.2}},
               {{"id": "c2"}}]"#
        )
        .unwrap();

        let repository = InMemoryRepository::load_from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(repository.len(), 2);
        assert_eq!(repository.get("c1").unwrap().distance, Some(0.2));
        assert!(repository.get("c2").unwrap().metadata.is_null());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let path = std::env::temp_dir().join(format!("records-missing-{}.json", std::process::id()));
        let result = InMemoryRepository::load_from_file(&path);

        let err = result.unwrap_err();
        assert!(matches!(err, RecordError::IoError { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_load_invalid_json() {
        let path = std::env::temp_dir().join(format!("records-bad-{}.json", std::process::id()));
        fs::write(&path, "{not json").unwrap();
        let result = InMemoryRepository::load_from_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(RecordError::JsonError { .. })));
    }
}
