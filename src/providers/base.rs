//! Base provider trait and common types for Hoos Who
//!
//! This module defines the Provider trait that chat-completion backends
//! implement, along with the message, request, and response types shared by
//! the dispatcher and the session transcript.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message in a conversation
///
/// Used both for the request sent upstream and for the session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use hooswho::providers::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("Who works at ICF?");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use hooswho::providers::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::assistant("Jane Doe works at ICF.");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub input_tokens: usize,
    /// Number of tokens in the completion
    pub output_tokens: usize,
}

/// One single-turn completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Fixed system instruction
    pub system: String,
    /// Conversation to complete
    pub messages: Vec<ChatMessage>,
    /// Ceiling on generated tokens
    pub max_tokens: u32,
}

/// Completion response with text and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// First text segment of the model output
    pub text: String,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a response without usage data
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Create a response with token usage
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// Provider trait for chat-completion backends
///
/// # Examples
///
/// ```no_run
/// use hooswho::providers::{CompletionRequest, CompletionResponse, Provider};
/// use hooswho::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new(request.messages[0].content.clone()))
///     }
///
///     fn model(&self) -> String {
///         "echo".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one completion request
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response has no text
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Name of the model answering requests
    fn model(&self) -> String;
}
