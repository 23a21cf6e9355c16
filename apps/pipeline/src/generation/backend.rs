//! Text-generation backends — pluggable, trait-based clients behind a
//! single `TextBackend` interface.
//!
//! Any backend conforming to `generate(prompt, params) -> GenerationOutput`
//! is interchangeable in the variant generator; backends are selected by
//! configuration, not hardcoded call sites.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::llm_client::prompts::GENERATION_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Output of one backend call, with usage accounting.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub text: String,
    pub cost: f64,
    pub tokens: u32,
    pub latency_seconds: f64,
}

/// The generation backend trait. Implement this to add a provider without
/// touching the variant generator.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Short label used in candidate strategy names, e.g. "claude".
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<GenerationOutput, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic backend
// ────────────────────────────────────────────────────────────────────────────

// Pricing per 1K tokens.
const CLAUDE_INPUT_COST_PER_1K: f64 = 0.003;
const CLAUDE_OUTPUT_COST_PER_1K: f64 = 0.015;

pub struct AnthropicBackend {
    client: LlmClient,
}

impl AnthropicBackend {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextBackend for AnthropicBackend {
    fn name(&self) -> &str {
        "claude"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<GenerationOutput, LlmError> {
        let start = Instant::now();
        let response = self
            .client
            .call(prompt, GENERATION_SYSTEM, params.temperature, params.max_tokens)
            .await?;
        let latency_seconds = start.elapsed().as_secs_f64();

        let text = response.text().ok_or(LlmError::EmptyContent)?.to_string();
        let tokens = response.usage.input_tokens + response.usage.output_tokens;
        let cost = token_cost(
            response.usage.input_tokens,
            response.usage.output_tokens,
            CLAUDE_INPUT_COST_PER_1K,
            CLAUDE_OUTPUT_COST_PER_1K,
        );

        Ok(GenerationOutput {
            text,
            cost,
            tokens,
            latency_seconds,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible backend
// ────────────────────────────────────────────────────────────────────────────

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4.1";
const OPENAI_INPUT_COST_PER_1K: f64 = 0.002;
const OPENAI_OUTPUT_COST_PER_1K: f64 = 0.008;
const OPENAI_MAX_RETRIES: u32 = 3;

pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model: OPENAI_DEFAULT_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl TextBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "gpt4"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<GenerationOutput, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": GENERATION_SYSTEM},
                {"role": "user", "content": prompt},
            ],
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let start = Instant::now();
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..OPENAI_MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("OpenAI API returned {}: {}", status, message);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let completion: ChatCompletionResponse = response.json().await?;
            let latency_seconds = start.elapsed().as_secs_f64();

            let text = completion
                .choices
                .first()
                .and_then(|c| c.message.content.clone())
                .ok_or(LlmError::EmptyContent)?;

            let tokens = completion.usage.prompt_tokens + completion.usage.completion_tokens;
            let cost = token_cost(
                completion.usage.prompt_tokens,
                completion.usage.completion_tokens,
                OPENAI_INPUT_COST_PER_1K,
                OPENAI_OUTPUT_COST_PER_1K,
            );

            return Ok(GenerationOutput {
                text,
                cost,
                tokens,
                latency_seconds,
            });
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: OPENAI_MAX_RETRIES,
        }))
    }
}

fn token_cost(tokens_in: u32, tokens_out: u32, in_per_1k: f64, out_per_1k: f64) -> f64 {
    (tokens_in as f64 / 1000.0) * in_per_1k + (tokens_out as f64 / 1000.0) * out_per_1k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cost_per_thousand() {
        let cost = token_cost(1000, 1000, 0.003, 0.015);
        assert!((cost - 0.018).abs() < 1e-9);
    }

    #[test]
    fn test_token_cost_zero_tokens() {
        assert_eq!(token_cost(0, 0, 0.003, 0.015), 0.0);
    }
}
