//! Export configuration
//!
//! Values come from the environment (usually a sourced `.env` file) and can be
//! overridden from the command line.

use std::path::PathBuf;

pub const DEFAULT_CONTAINER: &str = "n8n_editor";
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";
pub const DEFAULT_OUTPUT_DIR: &str = "workflows";

/// `{output}` is replaced with the quoted export directory
pub const DEFAULT_EXPORT_COMMAND: &str =
    "n8n export:workflow --all --output={output} --backup > /dev/null 2>&1";

/// Settings for one export pass
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Name of the execution context holding the platform
    pub container: String,
    /// Export command template run inside the context
    pub export_command: String,
    /// Root for the scratch directories inside the context
    pub scratch_dir: String,
    /// Host directory for active workflows; archived ones go to `archived/` below it
    pub output_dir: PathBuf,
    /// Where to write a YAML manifest of exported workflows, if anywhere
    pub manifest: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            export_command: DEFAULT_EXPORT_COMMAND.to_string(),
            scratch_dir: DEFAULT_SCRATCH_DIR.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            manifest: None,
        }
    }
}

impl ExportConfig {
    /// Load configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - N8N_CONTAINER: container running n8n (default `n8n_editor`)
    /// - N8N_EXPORT_COMMAND: export command template
    /// - N8N_SCRATCH_DIR: scratch root inside the container (default `/tmp`)
    /// - N8N_OUTPUT_DIR: host output directory (default `workflows`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            container: var("N8N_CONTAINER").unwrap_or(defaults.container),
            export_command: var("N8N_EXPORT_COMMAND").unwrap_or(defaults.export_command),
            scratch_dir: var("N8N_SCRATCH_DIR").unwrap_or(defaults.scratch_dir),
            output_dir: var("N8N_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            manifest: None,
        }
    }

    /// Host directory for archived workflows
    pub fn archived_dir(&self) -> PathBuf {
        self.output_dir.join("archived")
    }
}
