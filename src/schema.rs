//! Schema detection for upstream audit reports.
//!
//! The known shapes form a closed set ([`SchemaKind`]); classification happens
//! once, here, through explicit structural checks. The per-shape mapping
//! functions in [`crate::normalize`] never probe the document themselves, so
//! supporting a third upstream shape means extending the enum and adding one
//! mapping function.

use serde_json::Value;

use crate::model::SchemaKind;

/// Classifies a parsed report document.
///
/// Decision rule, in order: a top-level `advisories` object wins, then a
/// top-level `vulnerabilities` object, then [`SchemaKind::Unrecognized`].
/// Total over any JSON value; `Unrecognized` is a valid outcome, not a
/// failure.
pub fn detect(doc: &Value) -> SchemaKind {
    if doc.get("advisories").is_some_and(Value::is_object) {
        SchemaKind::LegacyAdvisories
    } else if doc.get("vulnerabilities").is_some_and(Value::is_object) {
        SchemaKind::CurrentVulnerabilities
    } else {
        SchemaKind::Unrecognized
    }
}

/// Explains why a document was classified [`SchemaKind::Unrecognized`], for
/// the `UnsupportedSchema` error message.
pub fn unrecognized_reason(doc: &Value) -> String {
    let Some(obj) = doc.as_object() else {
        return "top-level JSON value is not an object".to_string();
    };

    for key in ["advisories", "vulnerabilities"] {
        if let Some(value) = obj.get(key) {
            return format!(
                "`{}` is present but holds {} instead of an object",
                key,
                json_type_name(value)
            );
        }
    }

    if obj.is_empty() {
        return "top-level object is empty; expected an `advisories` or `vulnerabilities` object"
            .to_string();
    }

    let keys: Vec<&str> = obj.keys().map(String::as_str).take(8).collect();
    format!(
        "top-level object has neither an `advisories` nor a `vulnerabilities` object (found keys: {})",
        keys.join(", ")
    )
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
