use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use smart_commit::config::LlmConfig;
use smart_commit::core::ai::client::{ChatMessage, CompletionClient};
use smart_commit::core::git::context::{collect_context, GitContext, TRUNCATION_NOTICE};
use smart_commit::core::git::repository::RepositoryReader;
use smart_commit::core::pipeline::generate_commit_message;
use smart_commit::infrastructure::error::Error;

/// Completion double that replays a fixed response script and records the
/// sampling temperature of every call.
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, Error>>>,
    temperatures: Mutex<Vec<f32>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<String, Error>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            temperatures: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.temperatures.lock().unwrap().len()
    }

    fn temperatures(&self) -> Vec<f32> {
        self.temperatures.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn create(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _max_tokens: u32,
        temperature: f32,
    ) -> Result<String, Error> {
        self.temperatures.lock().unwrap().push(temperature);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("completion service called more often than the script allows")
    }
}

/// Repository double with canned query results.
struct StubRepo {
    inside: bool,
    branch: Option<String>,
    revision: Option<String>,
    status: String,
    diff: String,
}

impl StubRepo {
    fn with_staged_diff(diff: &str) -> Self {
        Self {
            inside: true,
            branch: Some("main".to_string()),
            revision: Some("abc1234".to_string()),
            status: "M  src/lib.rs\n".to_string(),
            diff: diff.to_string(),
        }
    }
}

#[async_trait]
impl RepositoryReader for StubRepo {
    async fn is_inside_work_tree(&self) -> Result<bool, Error> {
        Ok(self.inside)
    }

    async fn current_branch(&self) -> Result<Option<String>, Error> {
        Ok(self.branch.clone())
    }

    async fn short_revision(&self) -> Result<Option<String>, Error> {
        Ok(self.revision.clone())
    }

    async fn status_porcelain(&self) -> Result<String, Error> {
        Ok(self.status.clone())
    }

    async fn staged_diff(&self) -> Result<String, Error> {
        Ok(self.diff.clone())
    }
}

fn test_config() -> LlmConfig {
    LlmConfig {
        base_url: "http://localhost".to_string(),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        timeout_s: 5.0,
        max_tokens: 120,
        temperature: 0.7,
    }
}

fn test_context() -> GitContext {
    GitContext {
        branch: "main".to_string(),
        status_porcelain: "M  src/lib.rs".to_string(),
        staged_diff: "diff --git a/src/lib.rs b/src/lib.rs".to_string(),
        diff_truncated: false,
        original_diff_chars: 37,
    }
}

#[tokio::test]
async fn test_valid_first_output_uses_exactly_one_call() {
    let client = ScriptedClient::new(vec![Ok("feat: add commit generator".to_string())]);

    let message = generate_commit_message(&client, &test_context(), &test_config())
        .await
        .unwrap();

    assert_eq!(message, "feat: add commit generator");
    assert_eq!(client.call_count(), 1);
    assert_eq!(client.temperatures(), vec![0.7]);
}

#[tokio::test]
async fn test_wrapped_first_output_is_normalized_without_repair() {
    let client = ScriptedClient::new(vec![Ok("```\nfeat: add commit generator\n```".to_string())]);

    let message = generate_commit_message(&client, &test_context(), &test_config())
        .await
        .unwrap();

    assert_eq!(message, "feat: add commit generator");
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_invalid_first_output_triggers_one_deterministic_repair() {
    let client = ScriptedClient::new(vec![
        Ok("add commit generator".to_string()),
        Ok("feat: add commit generator".to_string()),
    ]);

    let message = generate_commit_message(&client, &test_context(), &test_config())
        .await
        .unwrap();

    assert_eq!(message, "feat: add commit generator");
    assert_eq!(client.call_count(), 2);
    // The repair call is pinned to temperature 0 regardless of configuration.
    assert_eq!(client.temperatures(), vec![0.7, 0.0]);
}

#[tokio::test]
async fn test_two_invalid_outputs_fail_without_a_third_call() {
    let client = ScriptedClient::new(vec![
        Ok("still not a commit message".to_string()),
        Ok("nope, sorry".to_string()),
    ]);

    let err = generate_commit_message(&client, &test_context(), &test_config())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidCommitMessage(_)));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_request_error_propagates_without_repair() {
    let client = ScriptedClient::new(vec![Err(Error::LlmRequest("boom".to_string()))]);

    let err = generate_commit_message(&client, &test_context(), &test_config())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::LlmRequest(_)));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_request_error_during_repair_propagates() {
    let client = ScriptedClient::new(vec![
        Ok("not a commit message".to_string()),
        Err(Error::LlmRequest("server went away".to_string())),
    ]);

    let err = generate_commit_message(&client, &test_context(), &test_config())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::LlmRequest(_)));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_collect_outside_a_repository_fails_before_any_completion_call() {
    let repo = StubRepo {
        inside: false,
        ..StubRepo::with_staged_diff("diff --git a/x b/x")
    };

    let err = collect_context(&repo, 8000).await.unwrap_err();
    assert!(matches!(err, Error::NotAGitRepository(_)));
}

#[tokio::test]
async fn test_collect_with_nothing_staged_fails() {
    let repo = StubRepo::with_staged_diff("   \n");

    let err = collect_context(&repo, 8000).await.unwrap_err();
    assert!(matches!(err, Error::NoStagedChanges(_)));
}

#[tokio::test]
async fn test_collect_strips_trailing_newlines() {
    let repo = StubRepo::with_staged_diff("diff --git a/x b/x\n+line\n");

    let context = collect_context(&repo, 8000).await.unwrap();
    assert_eq!(context.staged_diff, "diff --git a/x b/x\n+line");
    assert_eq!(context.status_porcelain, "M  src/lib.rs");
    assert!(!context.diff_truncated);
}

#[tokio::test]
async fn test_collect_synthesizes_detached_head_labels() {
    let mut repo = StubRepo::with_staged_diff("diff --git a/x b/x");
    repo.branch = None;

    let context = collect_context(&repo, 8000).await.unwrap();
    assert_eq!(context.branch, "detached@abc1234");

    repo.revision = None;
    let context = collect_context(&repo, 8000).await.unwrap();
    assert_eq!(context.branch, "detached");
}

#[tokio::test]
async fn test_collect_truncates_oversized_diff_by_characters() {
    let diff = "x".repeat(120);
    let repo = StubRepo::with_staged_diff(&diff);

    let context = collect_context(&repo, 100).await.unwrap();
    assert!(context.diff_truncated);
    assert_eq!(context.original_diff_chars, 120);
    assert_eq!(context.staged_diff, format!("{}{}", "x".repeat(100), TRUNCATION_NOTICE));
}

#[tokio::test]
async fn test_collect_leaves_diff_at_budget_untouched() {
    let diff = "y".repeat(100);
    let repo = StubRepo::with_staged_diff(&diff);

    let context = collect_context(&repo, 100).await.unwrap();
    assert!(!context.diff_truncated);
    assert_eq!(context.original_diff_chars, 100);
    assert_eq!(context.staged_diff, diff);
}

#[tokio::test]
async fn test_full_workflow_from_snapshot_to_message() {
    let repo = StubRepo::with_staged_diff("diff --git a/src/auth.rs b/src/auth.rs\n+fn login()");
    let context = collect_context(&repo, 8000).await.unwrap();

    let client = ScriptedClient::new(vec![
        Ok("\"add login\"".to_string()),
        Ok("Commit message: feat(auth): add login".to_string()),
    ]);

    let message = generate_commit_message(&client, &context, &test_config())
        .await
        .unwrap();

    assert_eq!(message, "feat(auth): add login");
    assert_eq!(client.call_count(), 2);
}
