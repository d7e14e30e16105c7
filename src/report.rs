//! Export report
//!
//! Collects what happened during a pass and renders it for the console.

use crate::workflows::{DuplicateEvent, KeptWorkflow, ManifestEntry, WorkflowStatus};
use owo_colors::{OwoColorize, Style};
use std::fmt::Write;

/// A parsed workflow that had no usable name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoNameEvent {
    pub id: String,
    /// The rejected name value, when a name field was present at all
    pub raw_name: Option<String>,
    pub status: WorkflowStatus,
}

/// All collisions for one output identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Display name of the first collision seen for the identifier
    pub name: String,
    pub slot: String,
    pub kept_id: String,
    pub kept_status: WorkflowStatus,
    pub ignored: Vec<(String, WorkflowStatus)>,
}

/// Outcome of one export pass
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Workflows written to the output tree, ordered by identifier
    pub exported: Vec<KeptWorkflow>,
    pub no_name: Vec<NoNameEvent>,
    pub duplicates: Vec<DuplicateEvent>,
    /// Entries of the previous manifest that this pass did not export
    pub removed: Vec<ManifestEntry>,
}

impl ExportReport {
    pub fn success_count(&self) -> usize {
        self.exported.len()
    }

    /// Unnamed workflows plus duplicate groups
    pub fn error_count(&self) -> usize {
        self.no_name.len() + self.duplicate_groups().len()
    }

    pub fn has_errors(&self) -> bool {
        !self.no_name.is_empty() || !self.duplicates.is_empty()
    }

    /// Duplicate events grouped by identifier in first-seen order
    ///
    /// The kept workflow of a group is the one kept by its latest event,
    /// which is the final holder of the identifier.
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = Vec::new();

        for event in &self.duplicates {
            let ignored = (event.ignored_id.clone(), event.ignored_status);
            match groups.iter_mut().find(|g| g.slot == event.slot) {
                Some(group) => {
                    group.kept_id = event.kept_id.clone();
                    group.kept_status = event.kept_status;
                    group.ignored.push(ignored);
                }
                None => groups.push(DuplicateGroup {
                    name: event.name.clone(),
                    slot: event.slot.clone(),
                    kept_id: event.kept_id.clone(),
                    kept_status: event.kept_status,
                    ignored: vec![ignored],
                }),
            }
        }

        groups
    }
}

/// Console formatting for export progress and reports
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    colored: bool,
}

impl ReportRenderer {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: impl std::fmt::Display, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, Style::new().blue())
    }

    fn highlight(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, Style::new().bright_yellow())
    }

    fn status(&self, status: WorkflowStatus) -> String {
        let style = match status {
            WorkflowStatus::Active => Style::new().green(),
            WorkflowStatus::Archived => Style::new().bright_yellow(),
        };
        format!("[{}]", self.paint(status.label(), style))
    }

    /// Banner printed before a pass starts
    pub fn banner(&self) -> String {
        self.heading("=== Exporting Workflows from n8n ===")
    }

    /// One line for a workflow accepted into the output tree
    pub fn success_line(&self, kept: &KeptWorkflow) -> String {
        let mut line = format!(
            "{} {} -> {}",
            self.paint("[OK]", Style::new().green()),
            kept.name,
            kept.file_name()
        );
        if kept.is_archived() {
            line.push(' ');
            line.push_str(&self.status(WorkflowStatus::Archived));
        }
        line
    }

    /// Success lines for every workflow written to the output tree
    pub fn exported(&self, report: &ExportReport) -> String {
        report
            .exported
            .iter()
            .map(|kept| format!("{}\n", self.success_line(kept)))
            .collect()
    }

    /// Full error sections and summary
    pub fn render(&self, report: &ExportReport) -> String {
        let mut out = String::new();

        if report.has_errors() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", self.heading("=== Export with errors ==="));

            for event in &report.no_name {
                self.render_no_name(&mut out, event);
            }
            for group in report.duplicate_groups() {
                self.render_duplicate_group(&mut out, &group);
            }
        }

        let _ = writeln!(out, "{}", self.heading("=== Summary ==="));
        let _ = writeln!(
            out,
            "{}",
            self.paint(
                format!("Exported successfully: {}", report.success_count()),
                Style::new().green()
            )
        );
        if !report.removed.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                self.paint(
                    format!("No longer exported: {}", report.removed.len()),
                    Style::new().bright_yellow()
                )
            );
        }
        let errors = report.error_count();
        if errors > 0 {
            let _ = writeln!(
                out,
                "{}",
                self.paint(format!("Export with errors: {}", errors), Style::new().red())
            );
        }

        out
    }

    fn render_no_name(&self, out: &mut String, event: &NoNameEvent) {
        let id = if event.id.is_empty() {
            "(unknown)"
        } else {
            event.id.as_str()
        };
        let red = Style::new().red();

        match &event.raw_name {
            Some(raw) => {
                let _ = writeln!(
                    out,
                    "Workflow: '{}' (ID: {})",
                    self.highlight(raw),
                    self.highlight(id)
                );
                let _ = writeln!(
                    out,
                    "{}",
                    self.paint("  Reason: Workflow name field is empty or invalid", red)
                );
            }
            None => {
                let _ = writeln!(out, "Workflow ID: {}", self.highlight(id));
                let _ = writeln!(
                    out,
                    "{}",
                    self.paint("  Reason: Workflow without name field", red)
                );
            }
        }
        let _ = writeln!(
            out,
            "{}",
            self.paint(
                "  Tip: run `wfx inspect <file>` on the exported JSON for details",
                Style::new().cyan()
            )
        );
        let _ = writeln!(out, "  Status: {}", self.status(event.status));
        let _ = writeln!(out);
    }

    fn render_duplicate_group(&self, out: &mut String, group: &DuplicateGroup) {
        let _ = writeln!(out, "Name: '{}'", self.highlight(&group.name));
        if group.slot != group.name {
            let _ = writeln!(out, "  File: {}.json", group.slot);
        }
        let _ = writeln!(
            out,
            "{}",
            self.paint(
                "  Reason: Multiple workflows with the same name",
                Style::new().bright_yellow()
            )
        );
        let _ = writeln!(
            out,
            "{} ID {} {}",
            self.paint("  Workflow kept:", Style::new().green()),
            group.kept_id,
            self.status(group.kept_status)
        );
        for (id, status) in &group.ignored {
            let _ = writeln!(
                out,
                "{} ID {} {}",
                self.paint("  Workflow ignored:", Style::new().red()),
                id,
                self.status(*status)
            );
        }
        let _ = writeln!(out);
    }
}
