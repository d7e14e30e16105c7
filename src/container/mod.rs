//! Remote execution contexts
//!
//! The exporter never talks to Docker directly. It goes through the
//! [`RemoteExecutor`] trait, which can run a shell command inside the
//! context, report whether the context is up, and copy a directory out
//! to the host.

mod docker;
mod local;

pub use docker::DockerExecutor;
pub use local::LocalExecutor;

use async_trait::async_trait;
use eyre::Result;
use std::path::Path;

/// Captured result of a shell command run inside an execution context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// `true` only when the command ran and exited with status 0
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    /// Build an output from raw process bytes, replacing invalid UTF-8
    pub fn from_bytes(success: bool, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            success,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    /// A failed output for a command that could not be started at all
    pub fn spawn_failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: error.to_string(),
        }
    }
}

/// An execution context that shell commands can be run inside of
///
/// # Example
/// ```no_run
/// use n8n_workflow_exporter::container::{DockerExecutor, RemoteExecutor};
///
/// # async fn example() -> eyre::Result<()> {
/// let docker = DockerExecutor::new("n8n_editor");
/// if docker.is_running().await? {
///     let output = docker.exec("ls /tmp").await;
///     println!("{}", output.stdout);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Human readable name of the context, used in logs and errors
    fn name(&self) -> &str;

    /// Whether the context is currently running
    ///
    /// # Errors
    /// Returns an error if the state of the context cannot be queried
    async fn is_running(&self) -> Result<bool>;

    /// Run a shell command inside the context
    ///
    /// Never fails: spawn errors and non-zero exits are both reported
    /// through [`ExecOutput::success`].
    async fn exec(&self, command: &str) -> ExecOutput;

    /// Copy the contents of `remote_dir` into the existing host directory `host_dir`
    ///
    /// # Errors
    /// Returns an error if the copy does not complete
    async fn copy_out(&self, remote_dir: &str, host_dir: &Path) -> Result<()>;
}
