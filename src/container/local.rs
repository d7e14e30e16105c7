//! Host shell execution context
//!
//! Useful when the platform runs directly on the host, and for exercising
//! a full export pass without a container.

use super::{ExecOutput, RemoteExecutor};
use async_trait::async_trait;
use eyre::{Context, Result};
use std::path::Path;
use tokio::process::Command;

/// Runs commands through `sh -c` on the local machine
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteExecutor for LocalExecutor {
    fn name(&self) -> &str {
        "local"
    }

    async fn is_running(&self) -> Result<bool> {
        Ok(true)
    }

    async fn exec(&self, command: &str) -> ExecOutput {
        log::debug!("sh -c {:?}", command);

        match Command::new("sh").arg("-c").arg(command).output().await {
            Ok(output) => {
                ExecOutput::from_bytes(output.status.success(), &output.stdout, &output.stderr)
            }
            Err(e) => ExecOutput::spawn_failure(e),
        }
    }

    async fn copy_out(&self, remote_dir: &str, host_dir: &Path) -> Result<()> {
        let source = Path::new(remote_dir);
        if !source.exists() {
            eyre::bail!("Staging directory does not exist: {}", source.display());
        }

        for entry in std::fs::read_dir(source)
            .with_context(|| format!("Failed to read directory: {}", source.display()))?
        {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(file_name) = path.file_name() {
                let target = host_dir.join(file_name);
                std::fs::copy(&path, &target).with_context(|| {
                    format!("Failed to copy {} to {}", path.display(), target.display())
                })?;
            }
        }

        Ok(())
    }
}
