//! Mapping for the legacy `advisories`-keyed report shape (npm audit v6).

use serde_json::Value;
use tracing::warn;

use super::{metadata_counts, tally, text_or_empty};
use crate::error::MalformedRecord;
use crate::model::{Finding, NormalizedReport, SchemaKind};

/// Normalizes a legacy document. Never fails: malformed advisory entries are
/// skipped and counted so the rest of the document still gates the build.
pub(crate) fn normalize(doc: &Value) -> NormalizedReport {
    let mut findings = Vec::new();
    let mut skipped = Vec::new();

    if let Some(advisories) = doc.get("advisories").and_then(Value::as_object) {
        for (key, entry) in advisories {
            match advisory_record(key, entry) {
                Ok(finding) => findings.push(finding),
                Err(defect) => {
                    warn!(%defect, "skipping malformed advisory record");
                    skipped.push(defect);
                }
            }
        }
    }

    // Prefer the document's own aggregate block; it also accounts for records
    // we had to skip.
    let counts = metadata_counts(doc).unwrap_or_else(|| tally(&findings));

    NormalizedReport {
        schema: SchemaKind::LegacyAdvisories,
        findings,
        counts,
        skipped,
    }
}

/// Maps one `advisories` entry to a canonical finding. The advisory id is the
/// entry's key, stringified.
fn advisory_record(key: &str, entry: &Value) -> Result<Finding, MalformedRecord> {
    let malformed = |reason: &str| MalformedRecord::new(SchemaKind::LegacyAdvisories, key, reason);

    let entry = entry
        .as_object()
        .ok_or_else(|| malformed("advisory entry is not an object"))?;
    let package = entry
        .get("module_name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing `module_name`"))?;
    let severity = entry
        .get("severity")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing `severity`"))?
        .parse()
        .map_err(|e: String| malformed(&e))?;

    Ok(Finding {
        id: key.to_string(),
        package: package.to_string(),
        severity,
        title: text_or_empty(entry, "title"),
        url: text_or_empty(entry, "url"),
        vulnerable_versions: text_or_empty(entry, "vulnerable_versions"),
        source: SchemaKind::LegacyAdvisories,
    })
}
