//! Name collision handling
//!
//! Several workflows can end up with the same sanitized identifier. The slot
//! table keeps one winner per identifier and every collision is recorded as a
//! [`DuplicateEvent`].

use super::record::{WorkflowStatus, is_newer};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Summary of the workflow currently holding an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptWorkflow {
    pub id: String,
    pub name: String,
    pub slot: String,
    pub status: WorkflowStatus,
    pub updated_at: String,
}

impl KeptWorkflow {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        slot: impl Into<String>,
        status: WorkflowStatus,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slot: slot.into(),
            status,
            updated_at: updated_at.into(),
        }
    }

    /// Output file name for this workflow
    pub fn file_name(&self) -> String {
        format!("{}.json", self.slot)
    }

    pub fn is_archived(&self) -> bool {
        self.status.is_archived()
    }
}

/// Record of one collision between two workflows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEvent {
    /// Display name of the workflow that arrived last
    pub name: String,
    /// Sanitized identifier both workflows map to
    pub slot: String,
    pub kept_id: String,
    pub ignored_id: String,
    pub kept_status: WorkflowStatus,
    pub ignored_status: WorkflowStatus,
}

impl DuplicateEvent {
    fn new(name: &str, kept: &KeptWorkflow, ignored: &KeptWorkflow) -> Self {
        Self {
            name: name.to_string(),
            slot: kept.slot.clone(),
            kept_id: kept.id.clone(),
            ignored_id: ignored.id.clone(),
            kept_status: kept.status,
            ignored_status: ignored.status,
        }
    }
}

/// Outcome of offering a workflow to the slot table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier was free
    Kept,
    /// The candidate displaced `previous`, whose staged file must be removed
    Replaced {
        previous: KeptWorkflow,
        event: DuplicateEvent,
    },
    /// The current holder stays and the candidate is dropped
    Ignored { event: DuplicateEvent },
}

impl Resolution {
    /// Whether the candidate now holds its identifier
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Resolution::Ignored { .. })
    }

    pub fn event(&self) -> Option<&DuplicateEvent> {
        match self {
            Resolution::Kept => None,
            Resolution::Replaced { event, .. } | Resolution::Ignored { event } => Some(event),
        }
    }
}

/// Sanitized identifier to kept workflow, for a single export pass
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    slots: BTreeMap<String, KeptWorkflow>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: &str) -> Option<&KeptWorkflow> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Kept workflows ordered by identifier
    pub fn kept(&self) -> impl Iterator<Item = &KeptWorkflow> {
        self.slots.values()
    }

    pub fn into_kept(self) -> Vec<KeptWorkflow> {
        self.slots.into_values().collect()
    }

    /// Undo the resolution that accepted `candidate`
    ///
    /// A replaced holder gets its identifier back and the collision is
    /// reported the other way round. A fresh slot is freed again.
    pub fn revert(
        &mut self,
        candidate: &KeptWorkflow,
        resolution: Resolution,
    ) -> Option<DuplicateEvent> {
        match resolution {
            Resolution::Kept => {
                self.slots.remove(&candidate.slot);
                None
            }
            Resolution::Replaced { previous, .. } => {
                let event = DuplicateEvent::new(&candidate.name, &previous, candidate);
                self.slots.insert(previous.slot.clone(), previous);
                Some(event)
            }
            Resolution::Ignored { event } => Some(event),
        }
    }
}

/// Whether `candidate` should take the identifier away from `current`
///
/// An active workflow always beats an archived one; otherwise a strictly later
/// `updatedAt` wins. Unknown timestamps never replace.
pub fn should_replace(current: &KeptWorkflow, candidate: &KeptWorkflow) -> bool {
    let revives = current.is_archived() && !candidate.is_archived();
    revives || is_newer(&current.updated_at, &candidate.updated_at).unwrap_or(false)
}

/// Offer `candidate` to the table and report what happened
///
/// # Example
/// ```
/// use n8n_workflow_exporter::workflows::{KeptWorkflow, Resolution, SlotTable, WorkflowStatus, resolve};
///
/// let mut table = SlotTable::new();
/// let old = KeptWorkflow::new("1", "Sync", "Sync", WorkflowStatus::Archived, "2023-01-01T00:00:00Z");
/// let new = KeptWorkflow::new("2", "Sync", "Sync", WorkflowStatus::Active, "2023-01-02T00:00:00Z");
///
/// assert_eq!(resolve(&mut table, old), Resolution::Kept);
/// assert!(matches!(resolve(&mut table, new), Resolution::Replaced { .. }));
/// assert_eq!(table.get("Sync").unwrap().id, "2");
/// ```
pub fn resolve(table: &mut SlotTable, candidate: KeptWorkflow) -> Resolution {
    let mut entry = match table.slots.entry(candidate.slot.clone()) {
        Entry::Vacant(vacant) => {
            vacant.insert(candidate);
            return Resolution::Kept;
        }
        Entry::Occupied(occupied) => occupied,
    };

    let current = entry.get();
    if should_replace(current, &candidate) {
        log::debug!(
            "Workflow {} replaces {} for '{}'",
            candidate.id,
            current.id,
            candidate.slot
        );
        let event = DuplicateEvent::new(&candidate.name, &candidate, current);
        let previous = entry.insert(candidate);
        Resolution::Replaced { previous, event }
    } else {
        log::debug!(
            "Workflow {} ignored, '{}' is held by {}",
            candidate.id,
            candidate.slot,
            current.id
        );
        Resolution::Ignored {
            event: DuplicateEvent::new(&candidate.name, current, &candidate),
        }
    }
}
