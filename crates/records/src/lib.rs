//! # Records Crate
//!
//! Candidate data for resume screening.
//!
//! ## Main Components
//!
//! - **types**: Domain types (RetrievalHit, CandidateRecord, CandidateMetadata, DegreeLevel)
//! - **parser**: Coercion of untyped retrieval metadata into typed records
//! - **store**: Resume repository trait and in-memory implementation
//! - **error**: Error types for repository operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use records::{ingest, InMemoryRepository, ResumeRepository};
//! use std::path::Path;
//!
//! let repository = InMemoryRepository::load_from_file(Path::new("data/sample_candidates.json"))?;
//! let records = ingest(repository.all().to_vec());
//!
//! for record in &records {
//!     println!("{} has {} years of experience", record.id, record.metadata.total_experience_years());
//! }
//! ```

pub mod error;
pub mod parser;
pub mod store;
pub mod types;

pub use error::{RecordError, Result};
pub use parser::{Coerced, FieldShapes, Shape, coerce_string_list, ingest, parse_metadata};
pub use store::{InMemoryRepository, ResumeRepository};
pub use types::{
    CandidateId, CandidateMetadata, CandidateRecord, DegreeLevel, EducationEntry, MetadataField,
    RetrievalHit, WorkEntry,
};
