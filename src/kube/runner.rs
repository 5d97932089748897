//! External command execution

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;

use crate::models::CommandSpec;

/// Runs an external command against one context's credential file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and return combined stdout and stderr
    ///
    /// A non-zero exit status is an error.
    async fn run(&self, kubeconfig: &Path, command: &CommandSpec) -> Result<String>;
}

/// Runs commands as child processes with `KUBECONFIG` set
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, kubeconfig: &Path, command: &CommandSpec) -> Result<String> {
        tracing::debug!(
            "Running `{}` with KUBECONFIG={}",
            command,
            kubeconfig.display()
        );

        let output = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .env("KUBECONFIG", kubeconfig)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to launch `{}`", command))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            anyhow::bail!(
                "`{}` exited with {}: {}",
                command,
                output.status,
                combined.trim()
            );
        }

        Ok(combined)
    }
}
