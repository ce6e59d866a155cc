/// Narrative client: the single point of entry for all Claude API calls in the report service.
///
/// The pipeline only sees the `NarrativeGenerator` trait; `LlmClient` is the production
/// implementation over the Anthropic Messages API.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod audit;

pub use audit::PromptAuditLog;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model for every artifact. Overridable with `LLM_MODEL`.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_RETRIES: u32 = 3;
const REFUSAL_STOP_REASON: &str = "refusal";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {}s", after.as_secs())]
    Timeout { after: Duration },

    #[error("LLM declined the request: {reason}")]
    Blocked { reason: String },

    #[error("ANTHROPIC_API_KEY is not configured")]
    NotConfigured,
}

/// The three texts produced for every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    ShortNarrative,
    Roadmap,
    LongForm,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::ShortNarrative => "short_narrative",
            ArtifactKind::Roadmap => "roadmap",
            ArtifactKind::LongForm => "long_form",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub artifact: ArtifactKind,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationOptions {
    /// Sampling defaults per artifact. The roadmap runs cooler to keep its JSON stable.
    pub fn for_artifact(artifact: ArtifactKind) -> Self {
        let (temperature, max_tokens) = match artifact {
            ArtifactKind::ShortNarrative => (0.7, 1200),
            ArtifactKind::Roadmap => (0.4, 1500),
            ArtifactKind::LongForm => (0.7, 2000),
        };
        Self {
            artifact,
            temperature,
            max_tokens,
        }
    }
}

/// Text generation capability used by the pipeline.
///
/// Implementations return the raw completion text. Blank output is rejected by the
/// pipeline regardless of what the implementation returns.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first non-blank text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .find(|t| !t.trim().is_empty())
    }

    /// The completion text, or the reason there is none.
    pub fn into_completion(self) -> Result<String, LlmError> {
        if self.stop_reason.as_deref() == Some(REFUSAL_STOP_REASON) {
            return Err(LlmError::Blocked {
                reason: self.text().unwrap_or(REFUSAL_STOP_REASON).to_string(),
            });
        }
        self.text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with retry logic, a bounded per-call timeout
/// and optional prompt auditing.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    audit: Option<PromptAuditLog>,
}

impl LlmClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: ANTHROPIC_API_URL.to_string(),
            api_key,
            model,
            timeout,
            audit: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key = config
            .anthropic_api_key
            .clone()
            .ok_or(LlmError::NotConfigured)?;
        let client = Self::new(api_key, config.llm_model.clone(), config.llm_timeout)?;
        Ok(client.with_audit(config.prompt_audit_dir.clone().map(PromptAuditLog::new)))
    }

    pub fn with_audit(mut self, audit: Option<PromptAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        options: &GenerationOptions,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    artifact = %options.artifact,
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                artifact = %options.artifact,
                "LLM call succeeded: input_tokens={}, output_tokens={}, stop_reason={:?}",
                llm_response.usage.input_tokens,
                llm_response.usage.output_tokens,
                llm_response.stop_reason
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl NarrativeGenerator for LlmClient {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        if let Some(audit) = &self.audit {
            audit.record(options.artifact, system, prompt);
        }

        let response = tokio::time::timeout(self.timeout, self.call(prompt, system, options))
            .await
            .map_err(|_| LlmError::Timeout {
                after: self.timeout,
            })??;

        response.into_completion()
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
