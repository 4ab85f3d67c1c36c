//! Normalization of detected report shapes into canonical findings.
//!
//! Each shape has one isolated, total mapping function (`legacy::normalize`,
//! `current::normalize`); this module only dispatches on the detected
//! [`SchemaKind`] and hosts the field helpers the mappings share. Malformed
//! records are skipped and carried in [`NormalizedReport::skipped`], never
//! fatal.

mod current;
mod legacy;

use serde_json::{Map, Value};

use crate::error::AuditError;
use crate::model::{Finding, NormalizedReport, SchemaKind, SeverityCounts};
use crate::schema;

/// Projects a detected document into the canonical finding list plus
/// aggregate severity counts.
///
/// # Errors
///
/// Returns [`AuditError::UnsupportedSchema`] for [`SchemaKind::Unrecognized`];
/// no partial result is produced in that case.
pub fn normalize(doc: &Value, kind: SchemaKind) -> Result<NormalizedReport, AuditError> {
    match kind {
        SchemaKind::LegacyAdvisories => Ok(legacy::normalize(doc)),
        SchemaKind::CurrentVulnerabilities => Ok(current::normalize(doc)),
        SchemaKind::Unrecognized => Err(AuditError::UnsupportedSchema {
            reason: schema::unrecognized_reason(doc),
        }),
    }
}

/// String field lookup with an empty-string default, for the fields the
/// upstream tools sometimes omit (title, url, version ranges).
pub(crate) fn text_or_empty(entry: &Map<String, Value>, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads the document's own `metadata.vulnerabilities` aggregate block, if
/// present and well-formed. A block whose per-level counts do not sum to its
/// own `total` does not qualify.
pub(crate) fn metadata_counts(doc: &Value) -> Option<SeverityCounts> {
    let block = doc.get("metadata")?.get("vulnerabilities")?;
    let counts: SeverityCounts = serde_json::from_value(block.clone()).ok()?;
    (counts.sum() == counts.total).then_some(counts)
}

/// Tallies counts from the normalized findings themselves.
pub(crate) fn tally(findings: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for finding in findings {
        counts.record(finding.severity);
    }
    counts
}
