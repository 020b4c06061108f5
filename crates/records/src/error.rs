//! Error types for the records crate.
//!
//! Only whole-file and repository operations fail. Per-record shape
//! problems never surface here: they are absorbed by the coercion layer
//! in [`crate::parser`] and recorded on the typed metadata instead.

use thiserror::Error;

/// Errors that can occur while loading or storing candidate records
#[derive(Error, Debug)]
pub enum RecordError {
    /// I/O error occurred while reading a file
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A file was readable but did not hold the expected JSON document
    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two resumes in one repository share an identifier
    #[error("Duplicate resume id: {id}")]
    DuplicateId { id: String },

    /// Lookup of an identifier the repository has never seen
    #[error("Unknown resume id: {id}")]
    NotFound { id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecordError>;
