use thiserror::Error;

/// Classified failures for a single commit-message generation run.
///
/// Each kind maps to a different user-facing remedy and exit code, so callers
/// must keep them distinct instead of collapsing them into a generic failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Not inside a git worktree, or the git binary is unavailable.
    #[error("{0}")]
    NotAGitRepository(String),

    /// A worktree exists but nothing is staged for commit.
    #[error("{0}")]
    NoStagedChanges(String),

    /// The completion service failed: timeout, transport error, bad status,
    /// malformed response schema, or empty generated text.
    #[error("{0}")]
    LlmRequest(String),

    /// The model output still fails the header grammar after the repair round.
    #[error("{0}")]
    InvalidCommitMessage(String),

    /// The run was interrupted before completion.
    #[error("canceled")]
    Canceled,
}

impl Error {
    /// Process exit code the CLI maps this failure to.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::LlmRequest(_) => 3,
            Error::Canceled => 130,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
