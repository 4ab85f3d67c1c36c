use serde::{Deserialize, Serialize};

use super::{Severity, SeverityCounts};
use crate::error::MalformedRecord;

/// Which upstream report shape a document (or a finding) came from.
///
/// The same advisory can be encoded differently per shape, so provenance is
/// kept on every finding for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// npm audit v6 and earlier: top-level `advisories` keyed by advisory id.
    LegacyAdvisories,
    /// npm audit v7+: top-level `vulnerabilities` keyed by package name, with
    /// a nested `via` array per package.
    CurrentVulnerabilities,
    /// Parsed as JSON but matches neither known shape.
    Unrecognized,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::LegacyAdvisories => "legacy-advisories",
            SchemaKind::CurrentVulnerabilities => "current-vulnerabilities",
            SchemaKind::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One advisory affecting one dependency, independent of the upstream shape.
///
/// Serialized field names are stable (`vulnerableVersions` etc.) so the JSON
/// report can be consumed by CI tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Upstream advisory identifier, stringified even when the source encoded
    /// it as a number.
    pub id: String,
    /// Name of the affected dependency.
    pub package: String,
    pub severity: Severity,
    /// Short human description; empty if absent upstream.
    pub title: String,
    /// Reference link; empty if absent upstream.
    pub url: String,
    /// Version-range expression as reported upstream. Opaque: never parsed.
    pub vulnerable_versions: String,
    /// Which shape this record was derived from.
    pub source: SchemaKind,
}

/// Output of normalization: the canonical findings, the aggregate counts, and
/// the per-record defects that were skipped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReport {
    pub schema: SchemaKind,
    /// Findings in the source document's key order.
    pub findings: Vec<Finding>,
    pub counts: SeverityCounts,
    /// Malformed records that were dropped instead of aborting the run.
    pub skipped: Vec<MalformedRecord>,
}
