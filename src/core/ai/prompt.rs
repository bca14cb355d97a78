use crate::core::ai::client::ChatMessage;
use crate::core::git::context::GitContext;
use crate::core::semantic::COMMIT_TYPES;

/// Messages for the initial generation call: the output contract plus the
/// repository context, embedded verbatim.
pub fn build_generation_messages(context: &GitContext) -> Vec<ChatMessage> {
    let allowed = COMMIT_TYPES.join(", ");
    let system = "You are a senior engineer. Generate a Conventional Commit message in English. \
                  Output ONLY the commit message (no quotes, no code fences, no extra text).";
    let user = format!(
        "Rules:\n\
         - Use Conventional Commits header format: type(scope): subject OR type: subject\n\
         - Allowed types: {allowed}\n\
         - Subject must be concise and imperative, no trailing period\n\
         - If a body is helpful, put it after a blank line\n\
         \n\
         Branch: {branch}\n\
         Git status (porcelain):\n\
         {status}\n\
         \n\
         Staged diff:\n\
         {diff}\n",
        branch = context.branch,
        status = context.status_porcelain,
        diff = context.staged_diff,
    );
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Messages for the single repair call, embedding the original raw output
/// from the failed generation attempt.
pub fn build_repair_messages(bad_output: &str) -> Vec<ChatMessage> {
    let allowed = COMMIT_TYPES.join(", ");
    let system = "You are a formatter. Fix the commit message to match Conventional Commits. \
                  Output ONLY the corrected commit message.";
    let user = format!(
        "Fix the following output to be a valid Conventional Commit message in English.\n\
         Requirements:\n\
         - Header must match: type(scope): subject OR type: subject\n\
         - Allowed types: {allowed}\n\
         - No quotes, no code fences, no leading labels\n\
         \n\
         Bad output:\n\
         {bad_output}\n",
    );
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
