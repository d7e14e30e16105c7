//! Export manifest
//!
//! Optionally written after a pass so the exported tree can be traced back
//! to workflow IDs.
//!
//! Example format:
//! ```yaml
//! workflows:
//!   - id: 3f9c1a
//!     name: Daily Sync
//!     file: Daily_Sync.json
//!     archived: false
//!   - id: 77ab02
//!     name: Old Import
//!     file: archived/Old_Import.json
//!     archived: true
//! ```

use super::conflict::KeptWorkflow;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Workflow entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestEntry {
    /// Workflow ID on the platform
    pub id: String,
    /// Display name as resolved from the export
    pub name: String,
    /// Path of the exported file, relative to the output directory
    pub file: String,
    pub archived: bool,
}

impl From<&KeptWorkflow> for ManifestEntry {
    fn from(kept: &KeptWorkflow) -> Self {
        let file = if kept.is_archived() {
            format!("archived/{}", kept.file_name())
        } else {
            kept.file_name()
        };
        Self {
            id: kept.id.clone(),
            name: kept.name.clone(),
            file,
            archived: kept.is_archived(),
        }
    }
}

/// Manifest of every workflow written by one export pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExportManifest {
    pub workflows: Vec<ManifestEntry>,
}

impl ExportManifest {
    /// Build a manifest sorted by file path
    pub fn from_kept<'a>(kept: impl IntoIterator<Item = &'a KeptWorkflow>) -> Self {
        let mut workflows: Vec<ManifestEntry> = kept.into_iter().map(ManifestEntry::from).collect();
        workflows.sort_by(|a, b| a.file.cmp(&b.file));
        Self { workflows }
    }

    pub fn count(&self) -> usize {
        self.workflows.len()
    }

    pub fn contains_id(&self, workflow_id: &str) -> bool {
        self.workflows.iter().any(|w| w.id == workflow_id)
    }

    /// Entries of `previous` whose workflow ID is no longer listed here
    pub fn removed_since(&self, previous: &ExportManifest) -> Vec<ManifestEntry> {
        previous
            .workflows
            .iter()
            .filter(|entry| !self.contains_id(&entry.id))
            .cloned()
            .collect()
    }

    /// Read manifest from YAML file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read export manifest: {}", path.as_ref().display())
        })?;

        serde_yaml::from_str(&content).with_context(|| "Failed to parse export manifest YAML")
    }

    /// Write manifest to YAML file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .with_context(|| "Failed to serialize export manifest to YAML")?;

        std::fs::write(path.as_ref(), yaml).with_context(|| {
            format!("Failed to write export manifest: {}", path.as_ref().display())
        })?;

        Ok(())
    }
}
