//! Exported workflow records and their timestamps

use super::name::{self, NameCandidate};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Whether a workflow is live or archived on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Active,
    Archived,
}

impl WorkflowStatus {
    pub fn from_archived(archived: bool) -> Self {
        if archived {
            WorkflowStatus::Archived
        } else {
            WorkflowStatus::Active
        }
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, WorkflowStatus::Archived)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStatus::Active => "active",
            WorkflowStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One exported workflow document
///
/// Borrows the parsed document for the time it takes to process it.
#[derive(Debug, Clone)]
pub struct WorkflowRecord<'a> {
    pub id: String,
    pub document: &'a Value,
    pub status: WorkflowStatus,
    pub updated_at: String,
}

impl<'a> WorkflowRecord<'a> {
    /// Build a record from a parsed export, falling back to the file stem for the id
    ///
    /// # Example
    /// ```
    /// use n8n_workflow_exporter::workflows::{WorkflowRecord, WorkflowStatus};
    /// use serde_json::json;
    ///
    /// let doc = json!({"name": "Sync", "isArchived": true});
    /// let record = WorkflowRecord::from_document(&doc, "/tmp/export/abc123.json");
    /// assert_eq!(record.id, "abc123");
    /// assert_eq!(record.status, WorkflowStatus::Archived);
    /// ```
    pub fn from_document(document: &'a Value, file_path: &str) -> Self {
        let id = document
            .get("id")
            .and_then(|id| match id {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| file_stem(file_path));

        let archived = document.get("isArchived").is_some_and(name::is_truthy);

        let updated_at = document
            .get("updatedAt")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            id,
            document,
            status: WorkflowStatus::from_archived(archived),
            updated_at,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status.is_archived()
    }

    pub fn name_candidate(&self) -> Option<NameCandidate> {
        name::find_candidate(self.document)
    }
}

/// File name without directories and without a trailing `.json`
fn file_stem(file_path: &str) -> String {
    let base = file_path.rsplit('/').next().unwrap_or(file_path);
    let stem = base.strip_suffix(".json").unwrap_or(base);
    if stem.is_empty() {
        base.to_string()
    } else {
        stem.to_string()
    }
}

/// A parsed `updatedAt` value
///
/// Offset-aware and naive timestamps can only be compared with their own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Parse an ISO-8601 timestamp; a trailing `Z` means UTC
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp::Aware(dt));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
            if let Ok(dt) = DateTime::parse_from_str(text, format) {
                return Some(Timestamp::Aware(dt));
            }
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Timestamp::Naive(dt));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Timestamp::Naive)
    }

    /// Order two timestamps, or `None` when they are not comparable
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Timestamp::Aware(a), Timestamp::Aware(b)) => Some(a.cmp(b)),
            (Timestamp::Naive(a), Timestamp::Naive(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Whether `candidate` is strictly later than `current`
///
/// `None` when either side is empty, unparseable, or they cannot be compared.
pub fn is_newer(current: &str, candidate: &str) -> Option<bool> {
    let current = Timestamp::parse(current)?;
    let candidate = Timestamp::parse(candidate)?;
    candidate
        .compare(&current)
        .map(|ordering| ordering == Ordering::Greater)
}
