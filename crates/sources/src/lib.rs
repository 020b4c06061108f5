//! # Sources Crate
//!
//! Everything on the query side of the screening pipeline.
//!
//! ## Components
//!
//! ### Criteria
//! Normalizes a partially populated hiring query into canonical criteria:
//! - Missing lists become empty, missing scalars become `None`
//! - Degree labels are mapped onto the ordered degree scale
//! - Criteria can be rendered back to query text for retrieval
//!
//! ### Retrieval
//! The boundary to the retrieval collaborator:
//! - `CandidateSource` trait returning ordered hits
//! - `LexicalSource`, a token-overlap stand-in backed by a resume repository
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{normalize, CandidateSource, LexicalSource, RawQuery};
//! use records::InMemoryRepository;
//! use std::sync::Arc;
//!
//! let repository = Arc::new(InMemoryRepository::load_from_file(path)?);
//! let criteria = normalize(RawQuery::from_json(&query_json)?);
//!
//! let source = LexicalSource::new(repository);
//! let hits = source.retrieve(&criteria, 50)?;
//! ```

pub mod criteria;
pub mod retrieval;

pub use criteria::{QueryCriteria, RawQuery, RawSalaryRange, SalaryRange, normalize};
pub use retrieval::{CandidateSource, LexicalSource};
