//! Workflow naming and deduplication
//!
//! Turns parsed n8n exports into display names, file-safe identifiers and
//! one winner per identifier.

mod conflict;
mod manifest;
mod name;
mod record;
mod sanitize;

pub use conflict::{DuplicateEvent, KeptWorkflow, Resolution, SlotTable, resolve, should_replace};
pub use manifest::{ExportManifest, ManifestEntry};
pub use name::{
    MAX_SCAN_DEPTH, NAME_PATHS, NameCandidate, NameSource, find_candidate, is_truthy, normalize,
    resolve_name,
};
pub use record::{Timestamp, WorkflowRecord, WorkflowStatus, is_newer};
pub use sanitize::{FALLBACK_IDENTIFIER, sanitize};
