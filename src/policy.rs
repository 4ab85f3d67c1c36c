//! Gating policy applied to normalized findings.
//!
//! A finding blocks the build when its severity is at or above the configured
//! threshold and its advisory id is not allowlisted. Everything else is
//! accepted. The verdict partitions the input; no finding is dropped here.

use serde::Serialize;

use crate::config::PolicyConfig;
use crate::model::Finding;

/// The outcome of evaluating findings against a policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Findings at or above the threshold whose id is not allowlisted.
    pub blocking: Vec<Finding>,
    /// Findings below the threshold, plus allowlisted ones at any severity.
    pub accepted: Vec<Finding>,
    /// True when nothing blocks.
    pub passed: bool,
}

/// Partitions findings into blocking and accepted per the policy. Input order
/// is preserved within each partition.
pub fn evaluate(findings: Vec<Finding>, config: &PolicyConfig) -> Verdict {
    let mut blocking = Vec::new();
    let mut accepted = Vec::new();

    for finding in findings {
        if finding.severity >= config.min_severity && !config.is_allowed(&finding.id) {
            blocking.push(finding);
        } else {
            accepted.push(finding);
        }
    }

    let passed = blocking.is_empty();
    Verdict {
        blocking,
        accepted,
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SchemaKind, Severity};

    fn finding(id: &str, severity: Severity) -> Finding {
        Finding {
            id: id.to_string(),
            package: format!("pkg-{id}"),
            severity,
            title: String::new(),
            url: String::new(),
            vulnerable_versions: String::new(),
            source: SchemaKind::LegacyAdvisories,
        }
    }

    #[test]
    fn blocks_at_or_above_threshold() {
        let config = PolicyConfig::with_threshold(Severity::High);
        let verdict = evaluate(
            vec![
                finding("1", Severity::Critical),
                finding("2", Severity::High),
                finding("3", Severity::Moderate),
                finding("4", Severity::Low),
            ],
            &config,
        );

        assert!(!verdict.passed);
        assert_eq!(verdict.blocking.len(), 2);
        assert_eq!(verdict.accepted.len(), 2);
        assert_eq!(verdict.blocking[0].id, "1");
        assert_eq!(verdict.blocking[1].id, "2");
    }

    #[test]
    fn allowlisted_id_is_accepted_at_any_severity() {
        let mut config = PolicyConfig::with_threshold(Severity::High);
        config.allow("704");

        let verdict = evaluate(vec![finding("704", Severity::Critical)], &config);

        assert!(verdict.passed);
        assert!(verdict.blocking.is_empty());
        assert_eq!(verdict.accepted.len(), 1);
        assert_eq!(verdict.accepted[0].id, "704");
    }

    #[test]
    fn allowlist_matches_id_not_package() {
        let mut config = PolicyConfig::with_threshold(Severity::High);
        config.allow("pkg-704");

        let verdict = evaluate(vec![finding("704", Severity::Critical)], &config);
        assert!(!verdict.passed);
    }

    #[test]
    fn empty_input_passes() {
        let verdict = evaluate(Vec::new(), &PolicyConfig::default());
        assert!(verdict.passed);
        assert!(verdict.blocking.is_empty());
        assert!(verdict.accepted.is_empty());
    }

    #[test]
    fn every_finding_lands_in_exactly_one_partition() {
        let mut config = PolicyConfig::with_threshold(Severity::Moderate);
        config.allow("2");

        let input = vec![
            finding("1", Severity::Critical),
            finding("2", Severity::High),
            finding("3", Severity::Low),
            finding("4", Severity::Moderate),
        ];
        let total = input.len();
        let verdict = evaluate(input, &config);

        assert_eq!(verdict.blocking.len() + verdict.accepted.len(), total);
    }

    #[test]
    fn lowering_the_threshold_never_unblocks() {
        let findings = vec![
            finding("1", Severity::Info),
            finding("2", Severity::Low),
            finding("3", Severity::Moderate),
            finding("4", Severity::High),
            finding("5", Severity::Critical),
        ];

        let mut previous = 0;
        // Critical down to Info: each step may only widen the blocking set.
        for threshold in Severity::ALL.iter().rev() {
            let config = PolicyConfig::with_threshold(*threshold);
            let verdict = evaluate(findings.clone(), &config);
            assert!(verdict.blocking.len() >= previous);
            previous = verdict.blocking.len();
        }
        assert_eq!(previous, findings.len());
    }

    #[test]
    fn partitions_preserve_input_order() {
        let config = PolicyConfig::with_threshold(Severity::High);
        let verdict = evaluate(
            vec![
                finding("1", Severity::Low),
                finding("2", Severity::Critical),
                finding("3", Severity::Info),
                finding("4", Severity::High),
            ],
            &config,
        );

        let blocking: Vec<&str> = verdict.blocking.iter().map(|f| f.id.as_str()).collect();
        let accepted: Vec<&str> = verdict.accepted.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(blocking, ["2", "4"]);
        assert_eq!(accepted, ["1", "3"]);
    }

    #[test]
    fn passed_is_exactly_blocking_emptiness() {
        let config = PolicyConfig::with_threshold(Severity::Critical);
        let clean = evaluate(vec![finding("1", Severity::High)], &config);
        assert!(clean.passed);

        let dirty = evaluate(vec![finding("1", Severity::Critical)], &config);
        assert!(!dirty.passed);
    }
}
