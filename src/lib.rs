//! n8n Workflow Exporter
//!
//! Exports workflows from a running n8n instance into a file tree named
//! after the workflows, with archived workflows kept apart.

pub mod cli;
pub mod config;
pub mod container;
pub mod export;
pub mod report;
pub mod workflows;

// Re-exports for convenience
pub use config::ExportConfig;
pub use container::{DockerExecutor, ExecOutput, LocalExecutor, RemoteExecutor};
pub use export::WorkflowExporter;
pub use report::{ExportReport, ReportRenderer};
