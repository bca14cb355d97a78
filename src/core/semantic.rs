use once_cell::sync::Lazy;
use regex::Regex;

use crate::infrastructure::error::Error;

/// Allowed Conventional Commit types, in display order.
pub const COMMIT_TYPES: [&str; 11] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<type>[a-z]+)(\((?P<scope>[^)\r\n]+)\))?(?P<breaking>!)?: (?P<subject>[^\r\n]+)$",
    )
    .expect("Failed to compile commit header regex")
});

static LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^commit\s+message\s*:\s*").expect("Failed to compile label regex")
});

/// Normalize a raw model output into a plain commit message candidate.
///
/// Strips one layer of code-fence or quote wrapping and a leading
/// "Commit message:" label. Multiply-wrapped output is unwrapped one layer
/// only; the pass is idempotent on the artifact classes it targets.
pub fn normalize_commit_message(text: &str) -> String {
    let mut msg = text.trim();

    // One fence layer, plus any leftover backticks around the content.
    if msg.starts_with("```") && msg.ends_with("```") {
        msg = msg.trim_matches('`').trim();
    }

    // One layer of matching straight quotes.
    if msg.len() >= 2
        && ((msg.starts_with('"') && msg.ends_with('"'))
            || (msg.starts_with('\'') && msg.ends_with('\'')))
    {
        msg = msg[1..msg.len() - 1].trim();
    }

    LABEL_REGEX.replace(msg, "").trim().to_string()
}

/// Validate a semantic commit message.
///
/// Only the first line (header) is validated; any body content after it is
/// accepted as-is.
pub fn validate_commit_message(message: &str) -> Result<(), Error> {
    let header = match message.lines().next().map(str::trim) {
        Some(line) if !line.is_empty() => line,
        _ => {
            return Err(Error::InvalidCommitMessage(
                "Invalid commit message: empty output. Expected format like 'feat: add X'."
                    .to_string(),
            ))
        }
    };

    let allowed = COMMIT_TYPES.join(", ");
    let caps = HEADER_REGEX.captures(header).ok_or_else(|| {
        Error::InvalidCommitMessage(format!(
            "Invalid commit message header. Expected 'type(scope): subject' or 'type: subject'. \
             Allowed types: {allowed}. Got: {header:?}"
        ))
    })?;

    let commit_type = &caps["type"];
    if !COMMIT_TYPES.contains(&commit_type) {
        return Err(Error::InvalidCommitMessage(format!(
            "Unknown commit type {commit_type:?}. Allowed types: {allowed}."
        )));
    }

    if caps["subject"].trim().is_empty() {
        return Err(Error::InvalidCommitMessage(
            "Commit subject must not be empty.".to_string(),
        ));
    }

    Ok(())
}
