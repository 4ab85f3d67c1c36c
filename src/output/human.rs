//! Human-readable report output format.
//!
//! Renders severity-sorted tables for the blocking and accepted partitions,
//! the skipped-record explanations, per-level counts, and the verdict line.

use std::cmp::Reverse;

use tabled::{settings::Style, Table, Tabled};

use crate::model::{Finding, Severity};
use crate::pipeline::AuditOutcome;

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Advisory")]
    advisory: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Vulnerable")]
    vulnerable: String,
}

/// Generate the human-readable report as a string
pub fn generate_human_string(outcome: &AuditOutcome) -> String {
    let mut out = String::new();

    out.push_str(&format!("Dependency audit gate ({})\n", outcome.schema));
    out.push_str(&format!(
        "Generated at: {}\n",
        outcome.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let verdict = &outcome.verdict;
    if verdict.blocking.is_empty() && verdict.accepted.is_empty() {
        out.push('\n');
        out.push_str("No findings.\n");
    }

    if !verdict.blocking.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Blocking findings ({}):\n",
            verdict.blocking.len()
        ));
        out.push_str(&findings_table(&verdict.blocking));
        out.push('\n');
    }

    if !verdict.accepted.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Accepted findings ({}):\n",
            verdict.accepted.len()
        ));
        out.push_str(&findings_table(&verdict.accepted));
        out.push('\n');
    }

    if !outcome.skipped.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Skipped {} malformed record(s):\n",
            outcome.skipped.len()
        ));
        for defect in &outcome.skipped {
            out.push_str(&format!("  - {}\n", defect));
        }
    }

    out.push('\n');
    out.push_str("Summary:\n");
    let counts = &outcome.counts;
    out.push_str(&format!("  Total findings: {}\n", counts.total));
    if counts.total > 0 {
        out.push_str(&format!(
            "  By severity: {} critical, {} high, {} moderate, {} low, {} info\n",
            counts.critical, counts.high, counts.moderate, counts.low, counts.info
        ));
    }
    out.push_str(&format!(
        "  Blocking threshold: {}\n",
        outcome.policy.min_severity
    ));
    if !outcome.policy.allow.is_empty() {
        let ids: Vec<&str> = outcome.policy.allow.iter().map(String::as_str).collect();
        out.push_str(&format!("  Allowlisted advisories: {}\n", ids.join(", ")));
    }

    out.push('\n');
    if verdict.passed {
        out.push_str("Verdict: \x1b[32mPASSED\x1b[0m\n");
    } else {
        out.push_str(&format!(
            "Verdict: \x1b[31mBLOCKED\x1b[0m ({} finding(s) at or above {})\n",
            verdict.blocking.len(),
            outcome.policy.min_severity
        ));
    }

    out
}

fn findings_table(findings: &[Finding]) -> String {
    let mut sorted: Vec<&Finding> = findings.iter().collect();
    sorted.sort_by_key(|f| Reverse(f.severity));

    let rows: Vec<FindingRow> = sorted
        .iter()
        .map(|f| FindingRow {
            severity: format_severity(f.severity),
            package: truncate(&f.package, 40),
            advisory: truncate(&f.id, 24),
            title: placeholder_if_empty(truncate(&f.title, 50)),
            vulnerable: placeholder_if_empty(truncate(&f.vulnerable_versions, 28)),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn format_severity(severity: Severity) -> String {
    match severity {
        Severity::Critical => "\x1b[31mCRITICAL\x1b[0m".to_string(),
        Severity::High => "\x1b[91mHIGH\x1b[0m".to_string(),
        Severity::Moderate => "\x1b[33mMODERATE\x1b[0m".to_string(),
        Severity::Low => "\x1b[32mLOW\x1b[0m".to_string(),
        Severity::Info => "INFO".to_string(),
    }
}

fn placeholder_if_empty(s: String) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
