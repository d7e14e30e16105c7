//! Export orchestration
//!
//! Drives the platform export inside the execution context and materializes
//! the accepted workflows on the host.

mod exporter;
mod staging;

pub use exporter::WorkflowExporter;
pub use staging::{ACTIVE_DIR, ARCHIVED_DIR, EXPORT_DIR, OUTPUT_PLACEHOLDER, StagingArea};
