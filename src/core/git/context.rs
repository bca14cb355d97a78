use crate::core::git::repository::RepositoryReader;
use crate::infrastructure::error::Error;

/// Fixed notice appended when the staged diff exceeds the character budget.
pub const TRUNCATION_NOTICE: &str = "\n\n[NOTE] The staged diff is truncated for performance.\n";

/// Snapshot of the repository state fed to the model.
///
/// Constructed once per invocation by [`collect_context`] and read-only
/// afterward. `staged_diff` is never empty: the absence of staged changes is
/// a construction-time failure, not a zero-length snapshot.
#[derive(Debug, Clone)]
pub struct GitContext {
    /// Current branch, or a `detached@<rev>` placeholder.
    pub branch: String,
    /// `git status --porcelain=v1`, trailing newline stripped.
    pub status_porcelain: String,
    /// Staged diff, trailing newline stripped, possibly truncated.
    pub staged_diff: String,
    /// Whether `staged_diff` was cut to the character budget.
    pub diff_truncated: bool,
    /// Diff size in characters before any truncation.
    pub original_diff_chars: usize,
}

/// Collect the staged diff and minimal metadata from `reader`.
///
/// Diffs longer than `max_diff_chars` characters are cut to the budget with
/// [`TRUNCATION_NOTICE`] appended; downstream stages never truncate again.
pub async fn collect_context(
    reader: &dyn RepositoryReader,
    max_diff_chars: usize,
) -> Result<GitContext, Error> {
    if !reader.is_inside_work_tree().await? {
        return Err(Error::NotAGitRepository("not inside a git worktree".to_string()));
    }

    // Branch resolution must work even without an initial commit.
    let branch = match reader.current_branch().await? {
        Some(branch) => branch,
        None => match reader.short_revision().await? {
            Some(rev) => format!("detached@{rev}"),
            None => "detached".to_string(),
        },
    };

    let status_porcelain = reader
        .status_porcelain()
        .await?
        .trim_end_matches('\n')
        .to_string();
    let mut staged_diff = reader.staged_diff().await?.trim_end_matches('\n').to_string();

    if staged_diff.trim().is_empty() {
        return Err(Error::NoStagedChanges("no staged diff".to_string()));
    }

    let original_diff_chars = staged_diff.chars().count();
    let diff_truncated = original_diff_chars > max_diff_chars;
    if diff_truncated {
        staged_diff = staged_diff.chars().take(max_diff_chars).collect();
        staged_diff.push_str(TRUNCATION_NOTICE);
    }

    Ok(GitContext {
        branch,
        status_porcelain,
        staged_diff,
        diff_truncated,
        original_diff_chars,
    })
}
