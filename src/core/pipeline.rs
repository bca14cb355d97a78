use tracing::debug;

use crate::config::LlmConfig;
use crate::core::ai::client::CompletionClient;
use crate::core::ai::prompt;
use crate::core::git::context::GitContext;
use crate::core::semantic::{normalize_commit_message, validate_commit_message};
use crate::infrastructure::error::Error;

/// Generate and validate a commit message for `context`.
///
/// Performs at most two completion calls: the generation call, and a single
/// deterministic repair call when the first output fails validation. The
/// one-repair bound is a contract, not a tunable. Request failures propagate
/// unchanged and are never retried here.
pub async fn generate_commit_message(
    client: &dyn CompletionClient,
    context: &GitContext,
    cfg: &LlmConfig,
) -> Result<String, Error> {
    let raw = client
        .create(
            &cfg.model,
            &prompt::build_generation_messages(context),
            cfg.max_tokens,
            cfg.temperature,
        )
        .await?;
    let message = normalize_commit_message(&raw);

    match validate_commit_message(&message) {
        Ok(()) => Ok(message),
        Err(Error::InvalidCommitMessage(reason)) => {
            debug!(%reason, "first output rejected, attempting one repair call");
            // The repair call reformats the original raw output at temperature 0.
            let repaired_raw = client
                .create(&cfg.model, &prompt::build_repair_messages(&raw), cfg.max_tokens, 0.0)
                .await?;
            let repaired = normalize_commit_message(&repaired_raw);
            validate_commit_message(&repaired)?;
            Ok(repaired)
        }
        Err(other) => Err(other),
    }
}
