//! End-to-end audit gate pipeline.
//!
//! Takes the raw text of an `npm audit --json` report and a policy, and
//! produces everything the renderers need: the detected shape, the canonical
//! findings partitioned into blocking and accepted, aggregate counts, and the
//! records that had to be skipped along the way.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::PolicyConfig;
use crate::error::{AuditError, MalformedRecord};
use crate::model::{NormalizedReport, SchemaKind, SeverityCounts};
use crate::policy::{self, Verdict};
use crate::{normalize, schema};

/// Everything produced by one run of the gate.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// Which report shape the input document carried.
    pub schema: SchemaKind,
    /// Severity totals for the normalized findings.
    pub counts: SeverityCounts,
    /// Records that could not be mapped and were skipped.
    pub skipped: Vec<MalformedRecord>,
    /// The policy decision over the findings.
    pub verdict: Verdict,
    /// When the gate ran.
    pub generated_at: DateTime<Utc>,
    /// The policy the findings were judged against.
    pub policy: PolicyConfig,
}

/// Runs the full pipeline over a raw report.
///
/// Fails only on input that cannot be processed at all. A failing gate is not
/// an error; it comes back as a verdict with `passed == false`.
pub fn run(raw: &str, policy: &PolicyConfig) -> Result<AuditOutcome, AuditError> {
    let doc = serde_json::from_str(raw).map_err(AuditError::InvalidJson)?;
    let kind = schema::detect(&doc);
    debug!(schema = %kind, "detected audit report shape");

    let NormalizedReport {
        schema,
        findings,
        counts,
        skipped,
    } = normalize::normalize(&doc, kind)?;
    let verdict = policy::evaluate(findings, policy);

    Ok(AuditOutcome {
        schema,
        counts,
        skipped,
        verdict,
        generated_at: Utc::now(),
        policy: policy.clone(),
    })
}
