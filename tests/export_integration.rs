//! Integration tests for full export passes
//!
//! These run the exporter against the host shell, with the platform's export
//! command replaced by a copy of fixture files.

use async_trait::async_trait;
use eyre::Result;
use n8n_workflow_exporter::container::{ExecOutput, LocalExecutor, RemoteExecutor};
use n8n_workflow_exporter::workflows::{ExportManifest, WorkflowStatus};
use n8n_workflow_exporter::{ExportConfig, ReportRenderer, WorkflowExporter};
use std::path::Path;
use tempfile::TempDir;

const FIXTURES: &[(&str, &str)] = &[
    (
        "01.json",
        r#"{"id": "1", "name": "Sync", "isArchived": true, "updatedAt": "2023-01-01T00:00:00Z"}"#,
    ),
    (
        "02.json",
        r#"{"id": "2", "name": "Sync", "isArchived": false, "updatedAt": "2023-01-02T00:00:00Z"}"#,
    ),
    (
        "03.json",
        r#"{"id": "3", "settings": {"name": "Lead Router"}, "isArchived": true}"#,
    ),
    ("04.json", r#"{"id": "4", "name": "null"}"#),
    ("05.json", "not json {"),
    (
        "06.json",
        r#"{"id": "6", "nodes": [{"parameters": {}, "name": "Webhook"}]}"#,
    ),
    ("07.json", r#"{"a": {"b": {"c": {"d": {"name": "Too deep"}}}}}"#),
    (
        "08.json",
        r#"{"id": "8", "name": "Report: Daily", "updatedAt": "2024-01-01T00:00:00Z"}"#,
    ),
    (
        "09.json",
        r#"{"id": "9", "name": "Report  Daily", "updatedAt": "2023-01-01T00:00:00Z"}"#,
    ),
    ("10.json", ""),
];

/// Write fixtures and build a config whose export command copies them
fn setup(dir: &Path, fixtures: &[(&str, &str)]) -> Result<ExportConfig> {
    let fixtures_dir = dir.join("fixtures");
    std::fs::create_dir_all(&fixtures_dir)?;
    for (file, content) in fixtures {
        std::fs::write(fixtures_dir.join(file), content)?;
    }

    let scratch = dir.join("scratch");
    std::fs::create_dir_all(&scratch)?;

    Ok(ExportConfig {
        export_command: format!(
            "cp {}/*.json {{output}}/ 2>/dev/null || true",
            fixtures_dir.display()
        ),
        scratch_dir: scratch.display().to_string(),
        output_dir: dir.join("out").join("workflows"),
        ..ExportConfig::default()
    })
}

fn fixture(name: &str) -> &'static str {
    FIXTURES
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, content)| *content)
        .unwrap()
}

#[tokio::test]
async fn test_full_export_pass() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = setup(temp_dir.path(), FIXTURES)?;
    let local = LocalExecutor::new();

    let report = WorkflowExporter::new(&local, &config).run().await?;

    let active = &config.output_dir;
    let archived = config.archived_dir();

    // Active copy of Sync wins over the archived one, in the active tree
    assert_eq!(
        std::fs::read_to_string(active.join("Sync.json"))?,
        fixture("02.json")
    );
    assert!(!archived.join("Sync.json").exists());

    // Archived workflows go to their own tree
    assert_eq!(
        std::fs::read_to_string(archived.join("Lead_Router.json"))?,
        fixture("03.json")
    );

    // Names found by the nested scan
    assert!(active.join("Webhook.json").exists());

    // Newer of two names that sanitize alike is kept
    assert_eq!(
        std::fs::read_to_string(active.join("Report__Daily.json"))?,
        fixture("08.json")
    );

    let slots: Vec<_> = report.exported.iter().map(|k| k.slot.as_str()).collect();
    assert_eq!(slots, vec!["Lead_Router", "Report__Daily", "Sync", "Webhook"]);
    assert_eq!(report.success_count(), 4);

    // Unnamed: "null" sentinel and a name below the scan depth
    assert_eq!(report.no_name.len(), 2);
    assert_eq!(report.no_name[0].id, "4");
    assert_eq!(report.no_name[0].raw_name.as_deref(), Some("null"));
    assert_eq!(report.no_name[1].id, "07");
    assert_eq!(report.no_name[1].raw_name, None);

    // Invalid and empty files are skipped without a report entry
    assert!(report.no_name.iter().all(|e| e.id != "05" && e.id != "10"));

    assert_eq!(report.duplicates.len(), 2);
    assert_eq!(report.duplicates[0].kept_id, "2");
    assert_eq!(report.duplicates[0].ignored_id, "1");
    assert_eq!(report.duplicates[0].ignored_status, WorkflowStatus::Archived);
    assert_eq!(report.duplicates[1].name, "Report  Daily");
    assert_eq!(report.duplicates[1].kept_id, "8");
    assert_eq!(report.duplicates[1].ignored_id, "9");
    assert_eq!(report.error_count(), 4);

    // One success line per file written, even though Sync was staged twice
    let renderer = ReportRenderer::plain();
    let lines = renderer.exported(&report);
    assert_eq!(lines.lines().count(), 4);
    assert_eq!(lines.matches("-> Sync.json").count(), 1);

    let rendered = renderer.render(&report);
    assert!(rendered.contains("Exported successfully: 4"));
    assert!(rendered.contains("Export with errors: 4"));

    Ok(())
}

#[tokio::test]
async fn test_arrival_order_does_not_change_winner() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = setup(
        temp_dir.path(),
        &[
            (
                "a.json",
                r#"{"id": "2", "name": "Sync", "isArchived": false, "updatedAt": "2023-01-02T00:00:00Z"}"#,
            ),
            (
                "b.json",
                r#"{"id": "1", "name": "Sync", "isArchived": true, "updatedAt": "2023-01-01T00:00:00Z"}"#,
            ),
        ],
    )?;
    let local = LocalExecutor::new();

    let report = WorkflowExporter::new(&local, &config).run().await?;

    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].id, "2");
    assert!(config.output_dir.join("Sync.json").exists());
    assert!(!config.archived_dir().join("Sync.json").exists());
    assert_eq!(report.duplicates[0].ignored_id, "1");

    Ok(())
}

#[tokio::test]
async fn test_scratch_is_reset_between_runs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = setup(temp_dir.path(), &[("a.json", r#"{"id": "1", "name": "One"}"#)])?;
    let local = LocalExecutor::new();

    WorkflowExporter::new(&local, &config).run().await?;

    std::fs::remove_file(temp_dir.path().join("fixtures").join("a.json"))?;
    std::fs::write(
        temp_dir.path().join("fixtures").join("b.json"),
        r#"{"id": "2", "name": "Two"}"#,
    )?;

    let report = WorkflowExporter::new(&local, &config).run().await?;
    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].name, "Two");
    assert!(
        !Path::new(&config.scratch_dir)
            .join("workflows_active")
            .join("One.json")
            .exists()
    );

    Ok(())
}

#[tokio::test]
async fn test_manifest_written() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = setup(temp_dir.path(), FIXTURES)?;
    let manifest_path = temp_dir.path().join("out").join("manifest").join("workflows.yml");
    config.manifest = Some(manifest_path.clone());
    let local = LocalExecutor::new();

    WorkflowExporter::new(&local, &config).run().await?;

    let manifest = ExportManifest::read(&manifest_path)?;
    assert_eq!(manifest.count(), 4);
    let lead = manifest.workflows.iter().find(|w| w.id == "3").unwrap();
    assert_eq!(lead.file, "archived/Lead_Router.json");
    assert!(lead.archived);
    assert!(!manifest.contains_id("1"));

    Ok(())
}

#[tokio::test]
async fn test_manifest_lists_workflows_no_longer_exported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = setup(
        temp_dir.path(),
        &[
            ("a.json", r#"{"id": "1", "name": "One"}"#),
            ("b.json", r#"{"id": "2", "name": "Two"}"#),
        ],
    )?;
    config.manifest = Some(temp_dir.path().join("workflows.yml"));
    let local = LocalExecutor::new();

    let first = WorkflowExporter::new(&local, &config).run().await?;
    assert!(first.removed.is_empty());

    std::fs::remove_file(temp_dir.path().join("fixtures").join("b.json"))?;
    let second = WorkflowExporter::new(&local, &config).run().await?;

    assert_eq!(second.removed.len(), 1);
    assert_eq!(second.removed[0].id, "2");
    assert_eq!(second.removed[0].file, "Two.json");
    assert!(
        ReportRenderer::plain()
            .render(&second)
            .contains("No longer exported: 1")
    );

    Ok(())
}

#[tokio::test]
async fn test_no_exports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = setup(temp_dir.path(), &[])?;
    let local = LocalExecutor::new();

    let report = WorkflowExporter::new(&local, &config).run().await?;

    assert_eq!(report.success_count(), 0);
    assert!(!report.has_errors());
    assert!(!config.output_dir.exists());

    Ok(())
}

#[tokio::test]
async fn test_failing_export_command_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = setup(temp_dir.path(), FIXTURES)?;
    config.export_command = "echo boom >&2; exit 2".to_string();
    let local = LocalExecutor::new();

    let err = WorkflowExporter::new(&local, &config)
        .run()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("boom"));
    assert!(!config.output_dir.exists());

    Ok(())
}

struct StoppedContainer;

#[async_trait]
impl RemoteExecutor for StoppedContainer {
    fn name(&self) -> &str {
        "n8n_editor"
    }

    async fn is_running(&self) -> Result<bool> {
        Ok(false)
    }

    async fn exec(&self, _command: &str) -> ExecOutput {
        panic!("no command should run in a stopped container");
    }

    async fn copy_out(&self, _remote_dir: &str, _host_dir: &Path) -> Result<()> {
        panic!("nothing should be copied from a stopped container");
    }
}

#[tokio::test]
async fn test_stopped_container_is_fatal() -> Result<()> {
    let config = ExportConfig::default();
    let err = WorkflowExporter::new(&StoppedContainer, &config)
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Container n8n_editor is not running");

    Ok(())
}

/// Host shell whose copies into one staged file always fail
struct BrokenStagedFile {
    inner: LocalExecutor,
    target: &'static str,
}

#[async_trait]
impl RemoteExecutor for BrokenStagedFile {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn is_running(&self) -> Result<bool> {
        self.inner.is_running().await
    }

    async fn exec(&self, command: &str) -> ExecOutput {
        if command.starts_with("cp ") && command.contains(self.target) {
            return ExecOutput::spawn_failure("cp: File name too long");
        }
        self.inner.exec(command).await
    }

    async fn copy_out(&self, remote_dir: &str, host_dir: &Path) -> Result<()> {
        self.inner.copy_out(remote_dir, host_dir).await
    }
}

#[tokio::test]
async fn test_failed_staging_skips_only_that_workflow() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = setup(
        temp_dir.path(),
        &[
            ("01.json", r#"{"id": "1", "name": "Bad"}"#),
            ("02.json", r#"{"id": "2", "name": "Good"}"#),
        ],
    )?;
    let executor = BrokenStagedFile {
        inner: LocalExecutor::new(),
        target: "workflows_active/Bad.json",
    };

    let report = WorkflowExporter::new(&executor, &config).run().await?;

    assert!(config.output_dir.join("Good.json").exists());
    assert!(!config.output_dir.join("Bad.json").exists());
    assert_eq!(report.success_count(), 1);
    assert_eq!(report.exported[0].id, "2");
    assert!(!report.has_errors());

    Ok(())
}

#[tokio::test]
async fn test_failed_replacement_keeps_previous_holder() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = setup(
        temp_dir.path(),
        &[
            (
                "01.json",
                r#"{"id": "1", "name": "Sync", "isArchived": true}"#,
            ),
            (
                "02.json",
                r#"{"id": "2", "name": "Sync", "isArchived": false}"#,
            ),
        ],
    )?;
    config.manifest = Some(temp_dir.path().join("workflows.yml"));
    let executor = BrokenStagedFile {
        inner: LocalExecutor::new(),
        target: "workflows_active/Sync.json",
    };

    let report = WorkflowExporter::new(&executor, &config).run().await?;

    // The archived copy was never removed, and still holds the name
    assert!(config.archived_dir().join("Sync.json").exists());
    assert!(!config.output_dir.join("Sync.json").exists());
    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].id, "1");
    assert_eq!(report.exported[0].status, WorkflowStatus::Archived);

    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].kept_id, "1");
    assert_eq!(report.duplicates[0].ignored_id, "2");

    let manifest = ExportManifest::read(config.manifest.as_ref().unwrap())?;
    assert_eq!(manifest.count(), 1);
    assert!(manifest.contains_id("1"));
    assert!(!manifest.contains_id("2"));

    Ok(())
}
