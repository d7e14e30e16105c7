//! Docker-backed execution context

use super::{ExecOutput, RemoteExecutor};
use async_trait::async_trait;
use eyre::{Context, Result};
use std::path::Path;
use tokio::process::Command;

/// Runs commands inside a named Docker container via the `docker` CLI
#[derive(Debug, Clone)]
pub struct DockerExecutor {
    container: String,
}

impl DockerExecutor {
    /// Create an executor for the container with the given name
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    /// Whether `docker ps --format {{.Names}}` output lists this container
    fn lists_container(&self, names: &str) -> bool {
        names.lines().any(|line| line.trim() == self.container)
    }
}

#[async_trait]
impl RemoteExecutor for DockerExecutor {
    fn name(&self) -> &str {
        &self.container
    }

    async fn is_running(&self) -> Result<bool> {
        log::debug!("Checking that container '{}' is running", self.container);

        let output = Command::new("docker")
            .args(["ps", "--format", "{{.Names}}"])
            .output()
            .await
            .context("Failed to run `docker ps`")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eyre::bail!("`docker ps` failed ({}): {}", output.status, stderr.trim());
        }

        Ok(self.lists_container(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn exec(&self, command: &str) -> ExecOutput {
        log::debug!("docker exec {} sh -c {:?}", self.container, command);

        match Command::new("docker")
            .args(["exec", self.container.as_str(), "sh", "-c", command])
            .output()
            .await
        {
            Ok(output) => {
                ExecOutput::from_bytes(output.status.success(), &output.stdout, &output.stderr)
            }
            Err(e) => {
                log::debug!("Failed to spawn docker exec: {}", e);
                ExecOutput::spawn_failure(e)
            }
        }
    }

    async fn copy_out(&self, remote_dir: &str, host_dir: &Path) -> Result<()> {
        let source = format!("{}:{}/.", self.container, remote_dir.trim_end_matches('/'));
        log::debug!("docker cp {} {}", source, host_dir.display());

        let output = Command::new("docker")
            .arg("cp")
            .arg(&source)
            .arg(host_dir)
            .output()
            .await
            .with_context(|| format!("Failed to run `docker cp {}`", source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eyre::bail!(
                "Failed to copy {} to {}: {}",
                source,
                host_dir.display(),
                stderr.trim()
            );
        }

        Ok(())
    }
}
