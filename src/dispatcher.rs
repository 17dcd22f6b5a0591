//! Query dispatcher: one upstream call per question, fail-soft
//!
//! [`QueryDispatcher::answer`] never returns an error. Any failure of the
//! upstream call (transport, status, decode, empty reply, timeout) is logged
//! server-side and replaced with [`FALLBACK_MESSAGE`]. There are no retries.

use std::sync::Arc;
use std::time::Duration;

use crate::directory::Directory;
use crate::error::{HoosWhoError, Result};
use crate::prompts::{build_user_prompt, SYSTEM_PROMPT};
use crate::providers::{ChatMessage, CompletionRequest, Provider};
use crate::security::AuditLog;

/// Reply shown to the user when the upstream call fails
pub const FALLBACK_MESSAGE: &str = "I'm having trouble processing your request right now. \
Please try again in a moment. If this continues, please contact support.";

/// Issues the single upstream call for a question
pub struct QueryDispatcher {
    provider: Arc<dyn Provider>,
    directory: Arc<Directory>,
    audit: Arc<AuditLog>,
    max_tokens: u32,
    timeout: Duration,
}

impl QueryDispatcher {
    /// Create a dispatcher
    ///
    /// # Arguments
    ///
    /// * `provider` - Upstream chat-completion provider
    /// * `directory` - Records serialized into every prompt
    /// * `audit` - Audit log receiving one line per query
    /// * `max_tokens` - Output token ceiling
    /// * `timeout` - Upper bound on the upstream call
    pub fn new(
        provider: Arc<dyn Provider>,
        directory: Arc<Directory>,
        audit: Arc<AuditLog>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            directory,
            audit,
            max_tokens,
            timeout,
        }
    }

    /// Directory used for prompts
    pub fn directory(&self) -> &Arc<Directory> {
        &self.directory
    }

    /// Audit log shared with the session handler
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// Build the request for `question`
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be serialized
    pub fn build_request(&self, question: &str) -> Result<CompletionRequest> {
        Ok(CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![ChatMessage::user(build_user_prompt(
                question,
                &self.directory,
            )?)],
            max_tokens: self.max_tokens,
        })
    }

    async fn try_answer(&self, question: &str) -> Result<String> {
        let request = self.build_request(question)?;
        let response = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| HoosWhoError::Timeout(self.timeout.as_secs()))??;

        if let Some(usage) = response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Completion usage"
            );
        }
        Ok(response.text)
    }

    /// Answer a sanitized question
    ///
    /// Returns the model text on success and [`FALLBACK_MESSAGE`] on any
    /// failure. Writes exactly one query line to the audit log, plus an
    /// error line with the cause on failure.
    pub async fn answer(&self, question: &str) -> String {
        let question_len = question.chars().count();
        match self.try_answer(question).await {
            Ok(text) => {
                self.audit
                    .record_query(question_len, text.chars().count(), true);
                tracing::info!(question_len, "Query answered");
                text
            }
            Err(e) => {
                tracing::error!("Upstream query failed: {:#}", e);
                self.audit.record_upstream_error(&format!("{:#}", e));
                self.audit.record_query(question_len, 0, false);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
