use std::env;
use std::str::FromStr;

use crate::cli::args::Args;

/// LLM endpoint and sampling configuration.
///
/// Resolution order, lowest to highest precedence: built-in defaults, `.env`
/// files, process environment (`SGC_*`, then `OPENAI_*`), CLI flags.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_s: f64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn new() -> Self {
        let mut config = LlmConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_s: 15.0,
            max_tokens: 120,
            temperature: 0.2,
        };

        #[cfg(not(test))]
        Self::load_env_files();
        config.load_from_env();

        config
    }

    /// Best-effort `.env` loading: current directory first, then the
    /// repository toplevel for runs from a subdirectory. Variables already
    /// present in the environment are never overridden.
    #[cfg(not(test))]
    fn load_env_files() {
        use std::path::{Path, PathBuf};
        use std::process::Command;

        if Path::new(".env").is_file() {
            let _ = dotenvy::from_path(".env");
            return;
        }

        let Ok(output) = Command::new("git").args(["rev-parse", "--show-toplevel"]).output()
        else {
            return;
        };
        if !output.status.success() {
            return;
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            return;
        }
        let _ = dotenvy::from_path(PathBuf::from(root).join(".env"));
    }

    fn load_from_env(&mut self) {
        if let Some(base_url) = env_any(&["SGC_BASE_URL", "OPENAI_BASE_URL"]) {
            self.base_url = base_url;
        }
        if let Some(api_key) = env_any(&["SGC_API_KEY", "OPENAI_API_KEY"]) {
            self.api_key = api_key;
        }
        if let Some(model) = env_any(&["SGC_MODEL", "OPENAI_MODEL"]) {
            self.model = model;
        }
        if let Some(timeout_s) = env_parsed("SGC_TIMEOUT_S") {
            self.timeout_s = timeout_s;
        }
        if let Some(max_tokens) = env_parsed("SGC_MAX_TOKENS") {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = env_parsed("SGC_TEMPERATURE") {
            self.temperature = temperature;
        }
    }

    /// Command-line flags have the highest precedence.
    pub fn update_from_args(&mut self, args: &Args) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(api_key) = &args.api_key {
            self.api_key = api_key.clone();
        }
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if let Some(timeout_s) = args.timeout_s {
            self.timeout_s = timeout_s;
        }
        if let Some(max_tokens) = args.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = args.temperature {
            self.temperature = temperature;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "Missing API key. Set SGC_API_KEY (or OPENAI_API_KEY) or pass --api-key"
            );
        }
        if self.timeout_s <= 0.0 {
            anyhow::bail!("Request timeout must be positive, got {}", self.timeout_s);
        }
        if self.max_tokens == 0 {
            anyhow::bail!("Max output tokens must be positive");
        }
        if self.temperature < 0.0 {
            anyhow::bail!("Temperature must be non-negative, got {}", self.temperature);
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.is_empty()))
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%name, %raw, "ignoring unparsable environment override");
            None
        }
    }
}
