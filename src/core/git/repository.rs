use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;

use crate::infrastructure::error::Error;

/// Read-only git queries needed to build a commit context.
///
/// The pipeline and its tests depend on this seam, never on a real working
/// tree.
#[async_trait]
pub trait RepositoryReader: Send + Sync {
    /// Whether the current directory is inside a git worktree.
    async fn is_inside_work_tree(&self) -> Result<bool, Error>;

    /// Short branch name, or `None` on a detached or unborn HEAD.
    async fn current_branch(&self) -> Result<Option<String>, Error>;

    /// Abbreviated HEAD revision, or `None` when HEAD does not resolve.
    async fn short_revision(&self) -> Result<Option<String>, Error>;

    /// `git status --porcelain=v1` output.
    async fn status_porcelain(&self) -> Result<String, Error>;

    /// `git diff --staged --no-color` output.
    async fn staged_diff(&self) -> Result<String, Error>;
}

/// [`RepositoryReader`] backed by the `git` binary.
#[derive(Debug, Default, Clone)]
pub struct GitCli {
    work_dir: Option<PathBuf>,
}

impl GitCli {
    /// Reader for the current working directory.
    pub fn new() -> Self {
        Self { work_dir: None }
    }

    /// Reader rooted at `path` instead of the current directory.
    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self { work_dir: Some(path.into()) }
    }

    async fn run(&self, args: &[&str]) -> Result<Output, Error> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }
        command.output().await.map_err(|e| {
            Error::NotAGitRepository(format!("git is not installed or not found in PATH: {e}"))
        })
    }

    /// Runs a git query and fails with the captured stderr on a non-zero exit.
    async fn run_checked(&self, args: &[&str]) -> Result<String, Error> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("git {} failed", args.join(" "))
            } else {
                stderr
            };
            return Err(Error::NotAGitRepository(detail));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs a git query, mapping a non-zero exit or empty output to `None`.
    async fn run_optional(&self, args: &[&str]) -> Result<Option<String>, Error> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }
}

#[async_trait]
impl RepositoryReader for GitCli {
    async fn is_inside_work_tree(&self) -> Result<bool, Error> {
        let out = self.run_checked(&["rev-parse", "--is-inside-work-tree"]).await?;
        Ok(out.trim().eq_ignore_ascii_case("true"))
    }

    async fn current_branch(&self) -> Result<Option<String>, Error> {
        self.run_optional(&["symbolic-ref", "--quiet", "--short", "HEAD"]).await
    }

    async fn short_revision(&self) -> Result<Option<String>, Error> {
        self.run_optional(&["rev-parse", "--short", "HEAD"]).await
    }

    async fn status_porcelain(&self) -> Result<String, Error> {
        self.run_checked(&["status", "--porcelain=v1"]).await
    }

    async fn staged_diff(&self) -> Result<String, Error> {
        self.run_checked(&["diff", "--staged", "--no-color"]).await
    }
}
