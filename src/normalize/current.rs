//! Mapping for the current `vulnerabilities`-keyed report shape (npm audit v7+).
//!
//! Each package entry carries a `via` array mixing detailed advisory objects
//! with plain-string cross-references to other vulnerable packages. Only the
//! detailed objects become findings; cross-references are navigation hints and
//! are dropped without being treated as defects.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::MalformedRecord;
use crate::model::{Finding, NormalizedReport, SchemaKind};
use crate::schema::json_type_name;

use super::{tally, text_or_empty};

/// Normalizes a current-shape document. Never fails: malformed entries are
/// skipped and counted while the rest of the document is still mapped.
pub(crate) fn normalize(doc: &Value) -> NormalizedReport {
    let mut findings = Vec::new();
    let mut skipped = Vec::new();

    if let Some(vulnerabilities) = doc.get("vulnerabilities").and_then(Value::as_object) {
        for (package, entry) in vulnerabilities {
            collect_package(package, entry, &mut findings, &mut skipped);
        }
    }

    // The document's metadata block counts affected packages, not advisories,
    // so it cannot describe the expanded finding list. Tally instead.
    let counts = tally(&findings);

    NormalizedReport {
        schema: SchemaKind::CurrentVulnerabilities,
        findings,
        counts,
        skipped,
    }
}

/// Expands one package entry into zero or more findings, one per detailed
/// `via` object.
fn collect_package(
    package: &str,
    entry: &Value,
    findings: &mut Vec<Finding>,
    skipped: &mut Vec<MalformedRecord>,
) {
    let malformed =
        |reason: &str| MalformedRecord::new(SchemaKind::CurrentVulnerabilities, package, reason);

    let Some(entry) = entry.as_object() else {
        let defect = malformed("package entry is not an object");
        warn!(%defect, "skipping malformed vulnerability record");
        skipped.push(defect);
        return;
    };
    let via = match entry.get("via") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            let defect = malformed(&format!(
                "`via` is {}, expected array",
                json_type_name(other)
            ));
            warn!(%defect, "skipping malformed vulnerability record");
            skipped.push(defect);
            return;
        }
        None => {
            let defect = malformed("missing `via` array");
            warn!(%defect, "skipping malformed vulnerability record");
            skipped.push(defect);
            return;
        }
    };

    for item in via {
        match item {
            Value::String(target) => {
                debug!(package, via = %target, "skipping cross-reference via entry");
            }
            Value::Object(advisory) => match via_record(package, advisory) {
                Ok(finding) => findings.push(finding),
                Err(defect) => {
                    warn!(%defect, "skipping malformed vulnerability record");
                    skipped.push(defect);
                }
            },
            other => {
                let defect = malformed(&format!(
                    "via entry is {}, expected object or string",
                    json_type_name(other)
                ));
                warn!(%defect, "skipping malformed vulnerability record");
                skipped.push(defect);
            }
        }
    }
}

/// Maps one detailed `via` object to a canonical finding. The advisory id
/// comes from `source`, stringified when numeric.
fn via_record(package: &str, advisory: &Map<String, Value>) -> Result<Finding, MalformedRecord> {
    let malformed =
        |reason: &str| MalformedRecord::new(SchemaKind::CurrentVulnerabilities, package, reason);

    let id = match advisory.get("source") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(malformed(&format!(
                "`source` is {}, expected number or string",
                json_type_name(other)
            )))
        }
        None => return Err(malformed("missing `source` on via entry")),
    };
    let severity = advisory
        .get("severity")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing `severity` on via entry"))?
        .parse()
        .map_err(|e: String| malformed(&e))?;
    // Advisory objects usually name their own package; fall back to the
    // enclosing entry's key when they do not.
    let name = advisory
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(package);

    Ok(Finding {
        id,
        package: name.to_string(),
        severity,
        title: text_or_empty(advisory, "title"),
        url: text_or_empty(advisory, "url"),
        vulnerable_versions: text_or_empty(advisory, "range"),
        source: SchemaKind::CurrentVulnerabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    const CURRENT_REPORT: &str = r#"{
  "auditReportVersion": 2,
  "vulnerabilities": {
    "express": {
      "name": "express",
      "severity": "critical",
      "isDirect": true,
      "via": ["lodash"],
      "effects": [],
      "range": "*",
      "nodes": ["node_modules/express"],
      "fixAvailable": false
    },
    "lodash": {
      "name": "lodash",
      "severity": "critical",
      "isDirect": false,
      "via": [
        {
          "source": 1065,
          "name": "lodash",
          "dependency": "lodash",
          "title": "Prototype Pollution",
          "url": "https://npmjs.com/advisories/1065",
          "severity": "critical",
          "range": "<4.17.12"
        },
        {
          "source": 1523,
          "name": "lodash",
          "dependency": "lodash",
          "title": "Regular Expression Denial of Service",
          "url": "https://npmjs.com/advisories/1523",
          "severity": "low",
          "range": "<4.17.11"
        }
      ],
      "effects": ["express"],
      "range": "<=4.17.11",
      "nodes": ["node_modules/lodash"],
      "fixAvailable": true
    }
  },
  "metadata": {
    "vulnerabilities": { "info": 0, "low": 0, "moderate": 0, "high": 0, "critical": 2, "total": 2 }
  }
}"#;

    fn parse(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn expands_each_detailed_via_object() {
        let report = normalize(&parse(CURRENT_REPORT));

        assert_eq!(report.schema, SchemaKind::CurrentVulnerabilities);
        assert_eq!(report.findings.len(), 2);
        assert!(report.skipped.is_empty());

        let first = &report.findings[0];
        assert_eq!(first.id, "1065");
        assert_eq!(first.package, "lodash");
        assert_eq!(first.severity, Severity::Critical);
        assert_eq!(first.title, "Prototype Pollution");
        assert_eq!(first.vulnerable_versions, "<4.17.12");
        assert_eq!(first.source, SchemaKind::CurrentVulnerabilities);

        assert_eq!(report.findings[1].id, "1523");
        assert_eq!(report.findings[1].severity, Severity::Low);
    }

    #[test]
    fn string_via_entries_are_not_findings_or_defects() {
        // The express entry carries only a cross-reference to lodash.
        let report = normalize(&parse(CURRENT_REPORT));
        assert!(report.findings.iter().all(|f| f.package == "lodash"));
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn counts_are_tallied_over_expanded_findings() {
        // The document's metadata says 2 critical (package-level); the
        // expanded list is 1 critical + 1 low.
        let report = normalize(&parse(CURRENT_REPORT));
        assert_eq!(report.counts.critical, 1);
        assert_eq!(report.counts.low, 1);
        assert_eq!(report.counts.total, 2);
        assert_eq!(report.counts.total as usize, report.findings.len());
    }

    #[test]
    fn falls_back_to_package_key_when_via_has_no_name() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "minimist": {
                    "severity": "moderate",
                    "via": [{ "source": 1179, "severity": "moderate", "range": "<1.2.3" }]
                }
            }
        });
        let report = normalize(&doc);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].package, "minimist");
    }

    #[test]
    fn keeps_string_source_as_is() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "minimist": {
                    "via": [{ "source": "GHSA-vh95-rmgr-6w4m", "severity": "moderate" }]
                }
            }
        });
        let report = normalize(&doc);
        assert_eq!(report.findings[0].id, "GHSA-vh95-rmgr-6w4m");
    }

    #[test]
    fn skips_via_object_missing_source() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "minimist": {
                    "via": [{ "severity": "moderate", "title": "no id" }]
                }
            }
        });
        let report = normalize(&doc);
        assert!(report.findings.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, "minimist");
        assert!(report.skipped[0].reason.contains("source"));
    }

    #[test]
    fn skips_via_object_missing_severity() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "minimist": {
                    "via": [{ "source": 1179, "title": "no severity" }]
                }
            }
        });
        let report = normalize(&doc);
        assert!(report.findings.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("severity"));
    }

    #[test]
    fn skips_package_entry_without_via_array() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "minimist": { "severity": "moderate", "range": "<1.2.3" },
                "lodash": {
                    "via": [{ "source": 1065, "severity": "critical" }]
                }
            }
        });
        let report = normalize(&doc);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, "minimist");
        assert!(report.skipped[0].reason.contains("missing"));
    }

    #[test]
    fn skips_package_entry_with_mistyped_via() {
        // A bare string here is not the cross-reference form; that only
        // exists inside the array.
        let doc = serde_json::json!({
            "vulnerabilities": {
                "lodash": { "via": "minimist" }
            }
        });
        let report = normalize(&doc);
        assert!(report.findings.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("string"));
        assert!(!report.skipped[0].reason.contains("missing"));
    }

    #[test]
    fn skips_via_entry_of_unexpected_type() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "minimist": { "via": [42] }
            }
        });
        let report = normalize(&doc);
        assert!(report.findings.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("number"));
    }

    #[test]
    fn bad_via_entry_does_not_poison_siblings() {
        let doc = serde_json::json!({
            "vulnerabilities": {
                "lodash": {
                    "via": [
                        { "severity": "critical" },
                        { "source": 1523, "severity": "low" }
                    ]
                }
            }
        });
        let report = normalize(&doc);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].id, "1523");
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn empty_vulnerabilities_object_yields_no_findings() {
        let doc = serde_json::json!({ "vulnerabilities": {} });
        let report = normalize(&doc);
        assert!(report.findings.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.counts.total, 0);
    }
}
