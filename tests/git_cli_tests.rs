use std::path::Path;
use std::process::Command;

use smart_commit::core::git::context::collect_context;
use smart_commit::core::git::repository::GitCli;
use smart_commit::infrastructure::error::Error;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git_in(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to spawn git");
    assert!(status.success(), "git {args:?} failed in {dir:?}");
}

#[tokio::test]
async fn test_collect_in_directory_without_git_metadata_fails() {
    let dir = tempfile::tempdir().unwrap();

    let repo = GitCli::in_dir(dir.path());
    let err = collect_context(&repo, 8000).await.unwrap_err();

    assert!(matches!(err, Error::NotAGitRepository(_)));
}

#[tokio::test]
async fn test_collect_in_clean_repository_reports_nothing_staged() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    git_in(dir.path(), &["init", "--quiet"]);

    let repo = GitCli::in_dir(dir.path());
    let err = collect_context(&repo, 8000).await.unwrap_err();

    assert!(matches!(err, Error::NoStagedChanges(_)));
}

#[tokio::test]
async fn test_collect_with_staged_file_builds_a_snapshot() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    git_in(dir.path(), &["init", "--quiet"]);
    std::fs::write(dir.path().join("hello.txt"), "hello\n").unwrap();
    git_in(dir.path(), &["add", "hello.txt"]);

    let repo = GitCli::in_dir(dir.path());
    let context = collect_context(&repo, 8000).await.unwrap();

    assert!(!context.branch.is_empty());
    assert!(context.status_porcelain.contains("hello.txt"));
    assert!(context.staged_diff.contains("hello.txt"));
    assert!(!context.diff_truncated);
    assert_eq!(context.original_diff_chars, context.staged_diff.chars().count());
}
