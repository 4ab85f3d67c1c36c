//! Gate policy configuration.
//!
//! The policy is assembled from CLI flags plus an optional TOML allowlist
//! file. Allowlist entries are advisory ids (the numeric id of a legacy
//! advisory, or the `source` of a current-shape via entry), matched exactly
//! against a finding's id.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::Severity;

/// The policy a set of findings is judged against.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Findings at this severity or above block, unless allowlisted.
    pub min_severity: Severity,
    /// Advisory ids whose findings are accepted regardless of severity.
    pub allow: BTreeSet<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::High,
            allow: BTreeSet::new(),
        }
    }
}

impl PolicyConfig {
    pub fn with_threshold(min_severity: Severity) -> Self {
        Self {
            min_severity,
            ..Self::default()
        }
    }

    /// Adds one advisory id to the allowlist.
    pub fn allow(&mut self, id: impl Into<String>) {
        self.allow.insert(id.into());
    }

    /// Adds every id from an iterator to the allowlist.
    pub fn extend_allow<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.allow.insert(id.into());
        }
    }

    pub fn is_allowed(&self, id: &str) -> bool {
        self.allow.contains(id)
    }
}

/// On-disk shape of the allowlist file.
///
/// ```toml
/// # 1065: lodash prototype pollution, accepted after review (SECURITY-412).
/// allow = ["1065", "GHSA-vh95-rmgr-6w4m"]
/// ```
#[derive(Debug, Deserialize, Default)]
struct AllowlistFile {
    #[serde(default)]
    allow: Vec<String>,
}

/// Reads an allowlist file and returns its advisory ids.
pub fn load_allowlist(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read allowlist file: {}", path.display()))?;
    let file: AllowlistFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse allowlist file: {}", path.display()))?;
    Ok(file.allow)
}
