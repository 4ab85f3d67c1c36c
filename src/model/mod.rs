//! Core data types for findings, severities, and normalized reports.
//!
//! This module contains the fundamental types used throughout audit-gate:
//!
//! - [`Severity`] - Total-ordered severity level of a finding
//! - [`SeverityCounts`] - Aggregate counts per severity level
//! - [`SchemaKind`] - Which upstream report shape a document matched
//! - [`Finding`] - A shape-independent vulnerability record
//! - [`NormalizedReport`] - Complete normalization output
//!
//! # Example
//!
//! ```
//! use audit_gate::{Finding, SchemaKind, Severity};
//!
//! let finding = Finding {
//!     id: "1065".to_string(),
//!     package: "lodash".to_string(),
//!     severity: Severity::High,
//!     title: "Prototype Pollution".to_string(),
//!     url: String::new(),
//!     vulnerable_versions: "<4.17.12".to_string(),
//!     source: SchemaKind::LegacyAdvisories,
//! };
//!
//! assert!(finding.severity >= Severity::Moderate);
//! ```

mod finding;
mod severity;

pub use finding::*;
pub use severity::*;
