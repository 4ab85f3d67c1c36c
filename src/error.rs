//! Error taxonomy for the audit pipeline.
//!
//! Two kinds abort a run outright: [`AuditError::InvalidJson`] (the input is
//! not JSON at all) and [`AuditError::UnsupportedSchema`] (JSON, but neither
//! known report shape). A [`MalformedRecord`] is recovered locally instead:
//! the normalizer drops the offending record and carries it in the report,
//! so one bad entry never masks the rest of the document.
//!
//! A failing policy verdict is deliberately *not* an error type; it is the
//! expected outcome `Verdict { passed: false }`, which the CLI maps to exit
//! code 1.

use thiserror::Error;

use crate::model::SchemaKind;

/// Fatal pipeline error. Both variants map to exit code 2.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Input bytes were not parseable JSON.
    #[error("invalid JSON in audit report: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Parsed as JSON but matches no known report shape.
    #[error("unsupported report schema: {reason}")]
    UnsupportedSchema { reason: String },
}

/// A single record within a recognized shape that is missing a mandatory
/// field. Skipped and counted, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed {shape} record `{key}`: {reason}")]
pub struct MalformedRecord {
    /// Shape the record was found under.
    pub shape: SchemaKind,
    /// The advisory id (legacy) or package name (current) the record sat
    /// under, for locating it in the source document.
    pub key: String,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(shape: SchemaKind, key: &str, reason: impl Into<String>) -> Self {
        Self {
            shape,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
