//! File-system safe identifiers for workflow names

use regex::Regex;
use std::sync::LazyLock;

/// Identifier used when nothing usable is left of a name
pub const FALLBACK_IDENTIFIER: &str = "unnamed";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

const EDGE_CHARS: &[char] = &['.', '_', '-'];

/// Convert a display name into a file name stem
///
/// Every character outside `[A-Za-z0-9._-]` becomes `_`, then leading and
/// trailing `.`, `_` and `-` are stripped.
///
/// # Example
/// ```
/// use n8n_workflow_exporter::workflows::sanitize;
///
/// assert_eq!(sanitize("My Workflow (v2)"), "My_Workflow__v2");
/// assert_eq!(sanitize("My-Workflow_01"), "My-Workflow_01");
/// assert_eq!(sanitize("***"), "unnamed");
/// ```
pub fn sanitize(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "_");
    let trimmed = replaced.trim_matches(EDGE_CHARS);

    if trimmed.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else {
        trimmed.to_string()
    }
}
