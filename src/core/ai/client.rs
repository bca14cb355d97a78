use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::infrastructure::error::Error;

/// A single role-tagged chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

/// Chat-completions boundary used by the generation pipeline.
///
/// Implementations perform exactly one outbound request per call, preserve
/// message order, and classify every failure as [`Error::LlmRequest`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn create(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, Error>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Normalize an OpenAI-compatible base URL.
///
/// A URL without a path gets `/v1` appended; a URL that already carries a
/// path (for providers not hosted under `/v1`) is kept as-is.
fn normalize_base_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/v1") {
        return base.to_string();
    }
    match url::Url::parse(base) {
        Ok(parsed) if parsed.path().trim_end_matches('/').is_empty() => format!("{base}/v1"),
        _ => base.to_string(),
    }
}

/// Minimal client speaking OpenAI-compatible Chat Completions.
///
/// One instance owns one connection pool for the lifetime of an invocation;
/// dropping it on any exit path releases the underlying transport.
pub struct ChatCompletionsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::LlmRequest(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(cfg: &LlmConfig) -> Result<Self, Error> {
        Self::new(&cfg.base_url, &cfg.api_key, Duration::from_secs_f64(cfg.timeout_s))
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn create(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, Error> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest { model, messages, max_tokens, temperature };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::LlmRequest(
                        "Request timed out. Try increasing --timeout-s or reducing \
                         --max-diff-chars."
                            .to_string(),
                    )
                } else {
                    Error::LlmRequest(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .map(|data| data.get("error").cloned().unwrap_or(data).to_string())
                .unwrap_or_else(|| body.trim().to_string());
            let suffix = if detail.is_empty() { String::new() } else { format!(" {detail}") };
            return Err(Error::LlmRequest(format!(
                "LLM request failed ({}) at {url}:{suffix}\nIf you are using a non-OpenAI \
                 provider, ensure --base-url/SGC_BASE_URL points to the API prefix that \
                 contains `/chat/completions`.",
                status.as_u16()
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|_| Error::LlmRequest("Invalid response schema from LLM server.".to_string()))?;

        let choice = body
            .choices
            .first()
            .ok_or_else(|| Error::LlmRequest("Invalid response schema from LLM server.".to_string()))?;
        let content = choice.message.content.as_deref().unwrap_or("").trim();

        if content.is_empty() {
            return Err(Error::LlmRequest("Empty response from LLM server.".to_string()));
        }

        Ok(content.to_string())
    }
}
