//! Workflow display name resolution
//!
//! Export payloads differ between platform versions, so the name can live in
//! several places. Known locations are tried first, then a bounded scan over
//! the document looks for any key ending in `name`.

use serde_json::Value;
use std::fmt;

/// Known name locations, tried in order
pub const NAME_PATHS: &[&str] = &[
    "name",
    "settings.name",
    "meta.name",
    "workflow.name",
    "info.name",
    "data.name",
    "workflowData.name",
];

/// Deepest nesting level visited by the fallback scan (the root is level 0)
pub const MAX_SCAN_DEPTH: usize = 3;

/// Where a name candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// One of the [`NAME_PATHS`]
    Field(&'static str),
    /// The recursive fallback scan
    Scan,
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameSource::Field(path) => write!(f, "field `{}`", path),
            NameSource::Scan => write!(f, "nested scan"),
        }
    }
}

/// A name candidate before sentinel filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub raw: String,
    pub source: NameSource,
}

impl NameCandidate {
    /// The usable display name, if the candidate is not blank or a sentinel
    pub fn resolved(&self) -> Option<String> {
        normalize(&self.raw)
    }
}

/// Resolve the display name of a workflow document
///
/// # Example
/// ```
/// use n8n_workflow_exporter::workflows::resolve_name;
/// use serde_json::json;
///
/// assert_eq!(resolve_name(&json!({"name": "  Sync  "})), Some("Sync".to_string()));
/// assert_eq!(resolve_name(&json!({"meta": {"name": "Meta"}})), Some("Meta".to_string()));
/// assert_eq!(resolve_name(&json!({"name": "null"})), None);
/// ```
pub fn resolve_name(document: &Value) -> Option<String> {
    find_candidate(document).and_then(|candidate| candidate.resolved())
}

/// Find the raw name candidate of a workflow document
///
/// The first known path holding a truthy scalar ends the search, even when
/// its value later turns out to be blank or a sentinel.
pub fn find_candidate(document: &Value) -> Option<NameCandidate> {
    for &path in NAME_PATHS {
        if let Some(raw) = lookup(document, path).and_then(scalar_text) {
            return Some(NameCandidate {
                raw,
                source: NameSource::Field(path),
            });
        }
    }

    scan(document, 0).map(|raw| NameCandidate {
        raw,
        source: NameSource::Scan,
    })
}

/// Trim a raw name and reject blanks and the `null`/`undefined` sentinels
pub fn normalize(raw: &str) -> Option<String> {
    match raw.trim() {
        "" | "null" | "undefined" => None,
        name => Some(name.to_string()),
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
    }
}

fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, key| current.as_object()?.get(key))
}

/// Text of a truthy scalar; containers never count as names
fn scalar_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_name_key(key: &str) -> bool {
    key.to_lowercase().ends_with("name")
}

fn scan(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_SCAN_DEPTH {
        return None;
    }
    let obj = value.as_object()?;

    for (key, child) in obj {
        if is_name_key(key) {
            if let Value::String(s) = child {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            } else if let Some(text) = scalar_text(child) {
                if normalize(&text).is_some() {
                    return Some(text.trim().to_string());
                }
            }
        }

        match child {
            Value::Object(_) => {
                if let Some(found) = scan(child, depth + 1) {
                    return Some(found);
                }
            }
            Value::Array(items) => {
                for item in items.iter().filter(|item| item.is_object()) {
                    if let Some(found) = scan(item, depth + 1) {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
    }

    None
}
