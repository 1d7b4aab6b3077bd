//! Cloning template repositories with git

use crate::error::{Error, Result};
use std::future::Future;
use std::path::Path;
use tokio::process::Command;

const GIT_DOWNLOAD_URL: &str = "https://git-scm.com/downloads";

/// Creates a fully populated directory from a repository URL, or fails
pub trait RepositoryCloner {
    fn clone_repository(
        &self,
        url: &str,
        target: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Clones with the `git` binary found on PATH
#[derive(Debug, Clone)]
pub struct GitCloner {
    program: String,
}

impl Default for GitCloner {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check if git is installed and runnable
    pub async fn is_installed(&self) -> bool {
        self.get_version().await.is_some()
    }

    /// Get the installed git version (if available)
    pub async fn get_version(&self) -> Option<String> {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .map(|s| s.trim().to_string())
                } else {
                    None
                }
            })
    }
}

impl RepositoryCloner for GitCloner {
    async fn clone_repository(&self, url: &str, target: &Path) -> Result<()> {
        let clone_error = |reason: String| Error::Clone {
            url: url.to_string(),
            reason,
        };

        if target.exists() {
            return Err(clone_error(format!(
                "destination '{}' already exists",
                target.display()
            )));
        }

        if !self.is_installed().await {
            return Err(clone_error(format!(
                "{} is not installed (install it from {})",
                self.program, GIT_DOWNLOAD_URL
            )));
        }

        tracing::info!(%url, target = %target.display(), "cloning template");

        // git's progress output goes straight to the terminal
        let status = Command::new(&self.program)
            .arg("clone")
            .arg(url)
            .arg(target)
            .status()
            .await
            .map_err(|e| clone_error(e.to_string()))?;

        if !status.success() {
            return Err(clone_error(match status.code() {
                Some(code) => format!("git exited with code {}", code),
                None => "git was terminated by a signal".to_string(),
            }));
        }

        Ok(())
    }
}
