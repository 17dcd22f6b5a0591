//! Anthropic Messages API provider
//!
//! Implements [`Provider`] by posting to `{api_base}/v1/messages` and reading
//! the first text content block of the reply.

use crate::config::{AnthropicConfig, ApiKey};
use crate::error::{HoosWhoError, Result};
use crate::providers::{ChatMessage, CompletionRequest, CompletionResponse, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API version header value sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API provider
///
/// The HTTP client carries no timeout of its own; callers bound the call
/// (see `QueryDispatcher`).
///
/// # Examples
///
/// ```no_run
/// use hooswho::config::{AnthropicConfig, ApiKey};
/// use hooswho::providers::{AnthropicProvider, ChatMessage, CompletionRequest, Provider};
///
/// # async fn example() -> hooswho::error::Result<()> {
/// let provider = AnthropicProvider::new(AnthropicConfig::default(), ApiKey::from_env()?)?;
/// let request = CompletionRequest {
///     system: "Be brief.".to_string(),
///     messages: vec![ChatMessage::user("Hello!")],
///     max_tokens: 100,
/// };
/// let response = provider.complete(&request).await?;
/// println!("{}", response.text);
/// # Ok(())
/// # }
/// ```
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
    api_key: ApiKey,
}

/// Request body for /v1/messages
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatMessage],
}

/// Response body from /v1/messages
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Content block in a reply
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    #[serde(default)]
    input_tokens: usize,
    #[serde(default)]
    output_tokens: usize,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: AnthropicConfig, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hooswho/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HoosWhoError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Anthropic provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: &request.messages,
        };

        tracing::debug!(
            "Sending Anthropic request: {} messages, max_tokens={}",
            request.messages.len(),
            request.max_tokens
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Anthropic request failed: {}", e);
                HoosWhoError::Provider(format!("Anthropic request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Anthropic returned error {}: {}", status, error_text);
            return Err(HoosWhoError::Provider(format!(
                "Anthropic returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Anthropic response: {}", e);
            HoosWhoError::Provider(format!("Failed to parse Anthropic response: {}", e))
        })?;

        tracing::debug!("Anthropic response: stop_reason={:?}", parsed.stop_reason);

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| {
                HoosWhoError::Provider("Anthropic response contained no text".to_string())
            })?;

        Ok(match parsed.usage {
            Some(usage) => CompletionResponse::with_usage(
                text,
                TokenUsage {
                    input_tokens: usage.input_tokens,
                    output_tokens: usage.output_tokens,
                },
            ),
            None => CompletionResponse::new(text),
        })
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
