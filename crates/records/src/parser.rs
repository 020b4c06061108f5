//! Ingestion of untyped retrieval metadata into [`CandidateMetadata`].
//!
//! The vector store flattens list fields into JSON-encoded strings, and the
//! resume extractor upstream sometimes emits a comma-joined string instead of
//! a list. Every field is coerced exactly once here, so nothing downstream
//! ever branches on the runtime type of a metadata value.
//!
//! Coercion never fails. Each coerced value carries a [`Shape`] describing how
//! it was obtained; unrepairable input becomes an empty value tagged
//! [`Shape::Malformed`] and is recorded on the metadata.

use crate::types::*;
use rayon::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

// =============================================================================
// Coerced values
// =============================================================================

/// How a coerced value was obtained from the raw metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Field missing or null
    Absent,
    /// Field already had the expected type
    Native,
    /// Field was a string and was decoded or split into a list
    Repaired,
    /// Field had a type that could not be repaired
    Malformed,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Shape::Absent => "absent",
            Shape::Native => "native",
            Shape::Repaired => "repaired",
            Shape::Malformed => "malformed",
        };
        f.write_str(label)
    }
}

/// Value-or-default result of coercing one field
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub shape: Shape,
}

impl<T: Default> Coerced<T> {
    fn absent() -> Self {
        Self {
            value: T::default(),
            shape: Shape::Absent,
        }
    }

    fn malformed() -> Self {
        Self {
            value: T::default(),
            shape: Shape::Malformed,
        }
    }
}

impl<T> Coerced<T> {
    fn new(value: T, shape: Shape) -> Self {
        Self { value, shape }
    }

    pub fn is_malformed(&self) -> bool {
        self.shape == Shape::Malformed
    }
}

/// Shape observed for every list field of one metadata bag
pub type FieldShapes = BTreeMap<MetadataField, Shape>;

// =============================================================================
// Field coercion
// =============================================================================

/// Coerce a raw value into a list of strings.
///
/// Accepted shapes:
/// - a JSON array: string elements are trimmed, numbers and booleans are
///   stringified, anything else is dropped
/// - a string holding a JSON array (how the vector store flattens lists)
/// - any other string, split on commas
///
/// Example: `"Python, Go,,Rust"` -> `["Python", "Go", "Rust"]`
pub fn coerce_string_list(raw: Option<&Value>) -> Coerced<Vec<String>> {
    match raw {
        None | Some(Value::Null) => Coerced::absent(),
        Some(Value::Array(items)) => Coerced::new(string_items(items), Shape::Native),
        Some(Value::String(text)) => {
            if let Some(items) = decode_json_array(text) {
                return Coerced::new(string_items(&items), Shape::Repaired);
            }
            let parts = text
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
            Coerced::new(parts, Shape::Repaired)
        }
        Some(_) => Coerced::malformed(),
    }
}

/// Coerce a raw value into a list of structured entries.
///
/// Accepts a JSON array or a string holding one. Elements that do not
/// deserialize into `T` are skipped; a string that is not a JSON array is
/// malformed since it cannot be split into structured entries.
pub fn coerce_entries<T: DeserializeOwned>(raw: Option<&Value>) -> Coerced<Vec<T>> {
    match raw {
        None | Some(Value::Null) => Coerced::absent(),
        Some(Value::Array(items)) => Coerced::new(decode_entries(items), Shape::Native),
        Some(Value::String(text)) => match decode_json_array(text) {
            Some(items) => Coerced::new(decode_entries(&items), Shape::Repaired),
            None if text.trim().is_empty() => Coerced::new(Vec::new(), Shape::Repaired),
            None => Coerced::malformed(),
        },
        Some(_) => Coerced::malformed(),
    }
}

/// Coerce a raw value into optional free text
pub fn coerce_text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decode_json_array(text: &str) -> Option<Vec<Value>> {
    let text = text.trim();
    if !text.starts_with('[') {
        return None;
    }
    serde_json::from_str::<Vec<Value>>(text).ok()
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn decode_entries<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .collect()
}

// =============================================================================
// Metadata ingestion
// =============================================================================

/// Convert a raw metadata bag into typed metadata plus the observed shapes.
///
/// A null bag is treated as empty metadata. Any other non-object bag marks
/// every list field malformed.
pub fn parse_metadata(raw: &Value) -> (CandidateMetadata, FieldShapes) {
    let empty = Map::new();
    let fields = match raw {
        Value::Object(fields) => fields,
        Value::Null => &empty,
        _ => {
            let metadata = CandidateMetadata {
                malformed: MetadataField::ALL.into_iter().collect(),
                ..CandidateMetadata::default()
            };
            let shapes = MetadataField::ALL
                .into_iter()
                .map(|field| (field, Shape::Malformed))
                .collect();
            return (metadata, shapes);
        }
    };

    let mut shapes = FieldShapes::new();
    let mut list = |field: MetadataField| {
        let coerced = coerce_string_list(fields.get(field.key()));
        shapes.insert(field, coerced.shape);
        coerced.value
    };
    let skills = list(MetadataField::Skills);
    let preferred_locations = list(MetadataField::PreferredLocations);
    let languages = list(MetadataField::Languages);
    let certifications = list(MetadataField::Certifications);

    let work_raw = fields
        .get(MetadataField::WorkHistory.key())
        .or_else(|| fields.get("work_history"));
    let work_history = coerce_entries::<WorkEntry>(work_raw);
    let education = coerce_entries::<EducationEntry>(fields.get(MetadataField::Education.key()));
    let projects = coerce_entries::<Value>(fields.get(MetadataField::Projects.key()));
    shapes.insert(MetadataField::WorkHistory, work_history.shape);
    shapes.insert(MetadataField::Education, education.shape);
    shapes.insert(MetadataField::Projects, projects.shape);

    let malformed = shapes
        .iter()
        .filter(|(_, shape)| **shape == Shape::Malformed)
        .map(|(field, _)| *field)
        .collect();

    let metadata = CandidateMetadata {
        name: coerce_text(fields.get("name")),
        email: coerce_text(fields.get("email")),
        phone: coerce_text(fields.get("phone")),
        skills,
        work_history: work_history.value,
        education: education.value,
        projects: projects.value,
        expected_salary: coerce_text(fields.get("expected_salary")),
        preferred_locations,
        languages,
        certifications,
        summary: coerce_text(fields.get("summary")),
        malformed,
    };
    (metadata, shapes)
}

impl CandidateRecord {
    /// Build a typed record from a retrieval hit, logging every repair
    pub fn from_hit(hit: RetrievalHit) -> Self {
        let (metadata, shapes) = parse_metadata(&hit.metadata);
        for (field, shape) in &shapes {
            match shape {
                Shape::Repaired => debug!("Candidate {}: repaired string-encoded {}", hit.id, field),
                Shape::Malformed => warn!("Candidate {}: malformed {} treated as empty", hit.id, field),
                Shape::Absent | Shape::Native => {}
            }
        }
        Self {
            id: hit.id,
            text: hit.text,
            metadata,
            distance: hit.distance,
        }
    }
}

/// Ingest a batch of hits in parallel, preserving retrieval order
pub fn ingest(hits: Vec<RetrievalHit>) -> Vec<CandidateRecord> {
    hits.into_par_iter().map(CandidateRecord::from_hit).collect()
}
