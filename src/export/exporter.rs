//! End-to-end export pass

use super::StagingArea;
use crate::config::ExportConfig;
use crate::container::RemoteExecutor;
use crate::report::{ExportReport, NoNameEvent};
use crate::workflows::{
    ExportManifest, KeptWorkflow, NameCandidate, Resolution, SlotTable, WorkflowRecord, resolve,
    sanitize,
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;

/// Runs one full export pass against an execution context
///
/// Every exported file is fetched, named, deduplicated and staged before the
/// next one is looked at.
///
/// # Example
/// ```no_run
/// use n8n_workflow_exporter::config::ExportConfig;
/// use n8n_workflow_exporter::container::DockerExecutor;
/// use n8n_workflow_exporter::export::WorkflowExporter;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = ExportConfig::from_env();
/// let docker = DockerExecutor::new(&config.container);
/// let report = WorkflowExporter::new(&docker, &config).run().await?;
/// println!("Exported {} workflow(s)", report.success_count());
/// # Ok(())
/// # }
/// ```
pub struct WorkflowExporter<'a> {
    executor: &'a dyn RemoteExecutor,
    config: &'a ExportConfig,
}

impl<'a> WorkflowExporter<'a> {
    pub fn new(executor: &'a dyn RemoteExecutor, config: &'a ExportConfig) -> Self {
        Self {
            executor,
            config,
        }
    }

    /// Run the pass
    ///
    /// # Errors
    /// Returns an error if the context is not running, the export command
    /// fails, or the output tree cannot be written. Unnamed and duplicate
    /// workflows are reported, not returned as errors.
    pub async fn run(&self) -> Result<ExportReport> {
        if !self.executor.is_running().await? {
            eyre::bail!("Container {} is not running", self.executor.name());
        }

        let staging = StagingArea::new(self.executor, self.config.scratch_dir.as_str());
        staging.prepare(&self.config.export_command).await?;

        let files = staging.list_exports().await;
        if files.is_empty() {
            log::warn!("No workflows found to export");
            return Ok(ExportReport::default());
        }
        log::info!("Found {} exported file(s)", files.len());

        let mut table = SlotTable::new();
        let mut report = ExportReport::default();

        for file in &files {
            self.process_file(&staging, file, &mut table, &mut report)
                .await;
        }

        let archived_dir = self.config.archived_dir();
        staging
            .materialize(&self.config.output_dir, &archived_dir)
            .await?;
        log::info!(
            "Wrote {} workflow(s) to {}",
            table.len(),
            self.config.output_dir.display().bright_black()
        );

        report.exported = table.into_kept();

        if let Some(path) = &self.config.manifest {
            let manifest = ExportManifest::from_kept(&report.exported);

            if path.exists() {
                match ExportManifest::read(path) {
                    Ok(previous) => report.removed = manifest.removed_since(&previous),
                    Err(e) => log::warn!("Ignoring previous manifest: {:#}", e),
                }
                for entry in &report.removed {
                    log::info!(
                        "Workflow {} ({}) is no longer exported",
                        entry.name,
                        entry.id.bright_black()
                    );
                }
            }

            manifest
                .write(path)
                .with_context(|| format!("Failed to write manifest {}", path.display()))?;
            log::info!(
                "Wrote manifest with {} workflow(s) to {}",
                manifest.count(),
                path.display().bright_black()
            );
        }

        Ok(report)
    }

    /// Fetch, name, deduplicate and stage one exported file
    ///
    /// Nothing in here stops the pass: unreadable files and failed copies
    /// are logged and the file is skipped.
    async fn process_file(
        &self,
        staging: &StagingArea<'_>,
        file: &str,
        table: &mut SlotTable,
        report: &mut ExportReport,
    ) {
        let Some(content) = staging.fetch(file).await else {
            log::warn!("Skipping {}: no content", file);
            return;
        };

        let document: Value = match serde_json::from_str(content.trim()) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Skipping {}: invalid JSON ({})", file, e);
                return;
            }
        };

        let record = WorkflowRecord::from_document(&document, file);
        let candidate = record.name_candidate();
        let Some(name) = candidate.as_ref().and_then(NameCandidate::resolved) else {
            log::debug!("Workflow {} has no usable name", record.id);
            report.no_name.push(NoNameEvent {
                id: record.id,
                raw_name: candidate.map(|c| c.raw),
                status: record.status,
            });
            return;
        };

        let slot = sanitize(&name);
        let kept = KeptWorkflow::new(record.id, name, slot, record.status, record.updated_at);

        let resolution = resolve(table, kept.clone());
        if let Resolution::Ignored { event } = resolution {
            report.duplicates.push(event);
            return;
        }

        if let Err(e) = staging.stage(file, &kept).await {
            log::warn!("Skipping workflow {}: {:#}", kept.id, e);
            if let Some(event) = table.revert(&kept, resolution) {
                report.duplicates.push(event);
            }
            return;
        }

        if let Resolution::Replaced { previous, event } = resolution {
            // Same status means the copy above already overwrote it
            if previous.status != kept.status {
                staging.unstage(&previous).await;
            }
            report.duplicates.push(event);
        }
    }
}
