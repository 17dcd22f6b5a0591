//! Provider module for Hoos Who
//!
//! This module contains the chat-completion provider abstraction, the
//! Anthropic implementation, and an in-process fake for tests.

pub mod anthropic;
pub mod base;
pub mod fake;

pub use anthropic::AnthropicProvider;
pub use base::{ChatMessage, CompletionRequest, CompletionResponse, Provider, Role, TokenUsage};
pub use fake::FakeProvider;

use crate::config::{AnthropicConfig, ApiKey};
use crate::error::Result;
use std::sync::Arc;

/// Create the provider used by the chat surfaces
///
/// # Errors
///
/// Returns error if provider initialization fails
pub fn create_provider(config: &AnthropicConfig, api_key: ApiKey) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(AnthropicProvider::new(config.clone(), api_key)?))
}
