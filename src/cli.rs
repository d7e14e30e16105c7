//! CLI helper functions

use crate::{
    config::ExportConfig,
    container::{DockerExecutor, LocalExecutor, RemoteExecutor},
    export::WorkflowExporter,
    report::{ExportReport, ReportRenderer},
    workflows::{NameCandidate, WorkflowRecord, WorkflowStatus, sanitize},
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Export all workflows and print progress and the final report
///
/// With `local` set, commands run on the host shell instead of inside the
/// configured container.
pub async fn export_workflows(
    config: &ExportConfig,
    local: bool,
    renderer: ReportRenderer,
) -> Result<ExportReport> {
    let executor: Box<dyn RemoteExecutor> = if local {
        log::info!("Using local shell as execution context");
        Box::new(LocalExecutor::new())
    } else {
        log::info!("Using container {}", config.container.cyan());
        Box::new(DockerExecutor::new(&config.container))
    };

    println!("{}", renderer.banner());

    let report = WorkflowExporter::new(executor.as_ref(), config)
        .run()
        .await?;

    print!("{}", renderer.exported(&report));
    print!("{}", renderer.render(&report));

    Ok(report)
}

/// What the exporter would make of a single workflow file
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowInspection {
    pub id: String,
    pub candidate: Option<NameCandidate>,
    pub name: Option<String>,
    pub slot: Option<String>,
    pub status: WorkflowStatus,
    pub updated_at: String,
}

impl fmt::Display for WorkflowInspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID:         {}", self.id)?;
        match &self.candidate {
            Some(candidate) => {
                writeln!(f, "Raw name:   {:?}", candidate.raw)?;
                writeln!(f, "Found in:   {}", candidate.source)?;
            }
            None => writeln!(f, "Raw name:   (none found)")?,
        }
        writeln!(
            f,
            "Name:       {}",
            self.name.as_deref().unwrap_or("(no usable name)")
        )?;
        if let Some(slot) = &self.slot {
            writeln!(f, "File:       {}.json", slot)?;
        }
        writeln!(f, "Status:     {}", self.status)?;
        writeln!(
            f,
            "Updated at: {}",
            if self.updated_at.is_empty() {
                "(unknown)"
            } else {
                self.updated_at.as_str()
            }
        )
    }
}

/// Resolve name, identifier and status for one exported workflow file
pub fn inspect_workflow(path: impl AsRef<Path>) -> Result<WorkflowInspection> {
    let path = path.as_ref();
    log::debug!("Inspecting {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let document: Value = serde_json::from_str(content.trim())
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    let record = WorkflowRecord::from_document(&document, &path.to_string_lossy());
    let candidate = record.name_candidate();
    let name = candidate.as_ref().and_then(NameCandidate::resolved);
    let slot = name.as_deref().map(sanitize);

    Ok(WorkflowInspection {
        id: record.id,
        candidate,
        name,
        slot,
        status: record.status,
        updated_at: record.updated_at,
    })
}
