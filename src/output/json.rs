//! JSON report output format.
//!
//! Field names are a stable contract for CI consumers; renames here are
//! breaking changes.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Finding, SchemaKind, Severity, SeverityCounts};
use crate::pipeline::AuditOutcome;

/// Wire shape of the JSON report.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    schema: SchemaKind,
    generated_at: DateTime<Utc>,
    passed: bool,
    minimum_blocking_severity: Severity,
    counts: SeverityCounts,
    skipped_count: usize,
    blocking: &'a [Finding],
    accepted: &'a [Finding],
}

/// Generate the JSON report as a string
pub fn generate_json_string(outcome: &AuditOutcome) -> Result<String> {
    let report = JsonReport {
        schema: outcome.schema,
        generated_at: outcome.generated_at,
        passed: outcome.verdict.passed,
        minimum_blocking_severity: outcome.policy.min_severity,
        counts: outcome.counts,
        skipped_count: outcome.skipped.len(),
        blocking: &outcome.verdict.blocking,
        accepted: &outcome.verdict.accepted,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
