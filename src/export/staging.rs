//! Scratch directories inside the execution context
//!
//! Layout under the scratch root:
//! - `workflows_export/`: raw output of the platform's export command
//! - `workflows_active/`: accepted active workflows, renamed
//! - `workflows_archived/`: accepted archived workflows, renamed

use crate::container::RemoteExecutor;
use crate::workflows::KeptWorkflow;
use eyre::{Context, Result};
use std::path::Path;

pub const EXPORT_DIR: &str = "workflows_export";
pub const ACTIVE_DIR: &str = "workflows_active";
pub const ARCHIVED_DIR: &str = "workflows_archived";

/// Placeholder in export command templates for the export directory
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

fn quote(path: &str) -> String {
    shell_words::quote(path).into_owned()
}

/// Staging directories owned by a single export pass
pub struct StagingArea<'a> {
    executor: &'a dyn RemoteExecutor,
    root: String,
}

impl<'a> StagingArea<'a> {
    pub fn new(executor: &'a dyn RemoteExecutor, root: impl Into<String>) -> Self {
        let root = root.into();
        let root = match root.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };
        Self { executor, root }
    }

    fn dir(&self, name: &str) -> String {
        if self.root == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", self.root, name)
        }
    }

    pub fn export_dir(&self) -> String {
        self.dir(EXPORT_DIR)
    }

    pub fn active_dir(&self) -> String {
        self.dir(ACTIVE_DIR)
    }

    pub fn archived_dir(&self) -> String {
        self.dir(ARCHIVED_DIR)
    }

    fn staged_dir(&self, kept: &KeptWorkflow) -> String {
        if kept.is_archived() {
            self.archived_dir()
        } else {
            self.active_dir()
        }
    }

    /// The shell command that resets the scratch dirs and runs the export
    pub fn prepare_command(&self, export_command: &str) -> String {
        let dirs = [self.export_dir(), self.active_dir(), self.archived_dir()]
            .iter()
            .map(|dir| quote(dir))
            .collect::<Vec<_>>()
            .join(" ");
        let export = export_command.replace(OUTPUT_PLACEHOLDER, &quote(&self.export_dir()));

        format!("rm -rf {dirs} && mkdir -p {dirs} && {export}")
    }

    /// Reset the scratch directories and run the platform export into them
    ///
    /// # Errors
    /// Returns an error if the export command fails
    pub async fn prepare(&self, export_command: &str) -> Result<()> {
        log::info!("Exporting workflows inside '{}'", self.executor.name());

        let output = self.executor.exec(&self.prepare_command(export_command)).await;
        if !output.success {
            eyre::bail!(
                "Error exporting workflows from n8n in '{}': {}",
                self.executor.name(),
                output.stderr.trim()
            );
        }

        Ok(())
    }

    /// Paths of the exported JSON files, in listing order
    pub async fn list_exports(&self) -> Vec<String> {
        let command = format!("ls {}/*.json 2>/dev/null || true", quote(&self.export_dir()));
        let output = self.executor.exec(&command).await;

        output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Read an exported file, going through a temporary copy first
    ///
    /// Falls back to reading the original path once if the copy is missing
    /// or empty. Returns `None` when neither read produced content.
    pub async fn fetch(&self, path: &str) -> Option<String> {
        let base = path.rsplit('/').next().unwrap_or(path);
        let temp = self.dir(&format!("workflow_temp_{}", base));

        self.executor
            .exec(&format!("cp {} {}", quote(path), quote(&temp)))
            .await;

        let mut output = self.executor.exec(&format!("cat {}", quote(&temp))).await;
        if !output.success || output.stdout.is_empty() {
            log::debug!("Temporary copy of {} unavailable, reading original", path);
            output = self.executor.exec(&format!("cat {}", quote(path))).await;
        }

        self.executor.exec(&format!("rm -f {}", quote(&temp))).await;

        (output.success && !output.stdout.is_empty()).then_some(output.stdout)
    }

    /// Copy an exported file into the active or archived staging dir
    ///
    /// An existing staged file for the same identifier in that dir is
    /// overwritten.
    ///
    /// # Errors
    /// Returns an error if the copy fails. Callers treat this as a per-record
    /// failure.
    pub async fn stage(&self, source: &str, kept: &KeptWorkflow) -> Result<()> {
        let target = format!("{}/{}", self.staged_dir(kept), kept.file_name());
        let output = self
            .executor
            .exec(&format!("cp {} {}", quote(source), quote(&target)))
            .await;

        if !output.success {
            eyre::bail!(
                "Failed to stage {} as {}: {}",
                source,
                target,
                output.stderr.trim()
            );
        }

        Ok(())
    }

    /// Remove the staged file of a workflow that lost its identifier
    pub async fn unstage(&self, kept: &KeptWorkflow) {
        let target = format!("{}/{}", self.staged_dir(kept), kept.file_name());
        let output = self.executor.exec(&format!("rm -f {}", quote(&target))).await;
        if !output.success {
            log::warn!("Failed to remove staged {}: {}", target, output.stderr.trim());
        }
    }

    /// Copy both staging dirs out to the host, creating the host dirs
    ///
    /// # Errors
    /// Returns an error if a host directory cannot be created or a copy fails
    pub async fn materialize(&self, active_host: &Path, archived_host: &Path) -> Result<()> {
        for dir in [active_host, archived_host] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        self.executor
            .copy_out(&self.active_dir(), active_host)
            .await
            .context("Failed to copy active workflows out")?;
        self.executor
            .copy_out(&self.archived_dir(), archived_host)
            .await
            .context("Failed to copy archived workflows out")?;

        Ok(())
    }
}
