//! Chat pipeline for one user attempt
//!
//! [`Assistant::submit`] runs a raw question through the sanitizer, the
//! session's rate window, and the dispatcher, then records the exchange in
//! the session transcript. Rejections leave the session untouched; an
//! upstream failure is not a rejection and still produces a transcript pair.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::directory::Directory;
use crate::dispatcher::QueryDispatcher;
use crate::error::HoosWhoError;
use crate::providers::{ChatMessage, Provider};
use crate::security::{AuditLog, RateWindow, Sanitizer};
use crate::session::Session;

/// Shared, stateless handler for chat attempts
///
/// Holds no per-user state: everything mutable lives in the [`Session`]
/// passed to each call.
pub struct Assistant {
    sanitizer: Sanitizer,
    dispatcher: QueryDispatcher,
    rate_limit: usize,
    rate_window: chrono::Duration,
}

impl Assistant {
    /// Assemble an assistant from its parts
    pub fn new(
        sanitizer: Sanitizer,
        dispatcher: QueryDispatcher,
        rate_limit: usize,
        rate_window: chrono::Duration,
    ) -> Self {
        Self {
            sanitizer,
            dispatcher,
            rate_limit,
            rate_window,
        }
    }

    /// Assemble an assistant from configuration
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::Config` if the rate window is out of range
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn Provider>,
        directory: Arc<Directory>,
        audit: Arc<AuditLog>,
    ) -> std::result::Result<Self, HoosWhoError> {
        let rate_window = config.security.rate_window()?;
        let dispatcher = QueryDispatcher::new(
            provider,
            directory,
            audit,
            config.provider.max_tokens,
            Duration::from_secs(config.provider.timeout_seconds),
        );
        Ok(Self::new(
            Sanitizer::new(
                config.security.max_input_chars,
                config.security.min_question_chars,
            ),
            dispatcher,
            config.security.max_queries_per_window,
            rate_window,
        ))
    }

    /// Start a session with this assistant's rate limits
    pub fn new_session(&self) -> Session {
        Session::new(self.new_rate_window())
    }

    /// Rate window configured for new sessions
    pub fn new_rate_window(&self) -> RateWindow {
        RateWindow::new(self.rate_limit, self.rate_window)
    }

    /// Queries allowed per session window
    pub fn rate_limit(&self) -> usize {
        self.rate_limit
    }

    /// Length of each session's rate window
    pub fn rate_window(&self) -> chrono::Duration {
        self.rate_window
    }

    /// Directory answering questions
    pub fn directory(&self) -> &Arc<Directory> {
        self.dispatcher.directory()
    }

    /// Handle one raw user attempt
    ///
    /// On success the sanitized question and the answer (possibly the
    /// fallback message) are appended to the transcript and the answer is
    /// returned.
    ///
    /// # Errors
    ///
    /// * `HoosWhoError::InvalidInput` - nothing usable left after sanitizing;
    ///   the attempt does not count against the rate limit
    /// * `HoosWhoError::RateLimitExceeded` - window full; no upstream call
    pub async fn submit(
        &self,
        session: &mut Session,
        raw: &str,
    ) -> std::result::Result<String, HoosWhoError> {
        let audit = self.dispatcher.audit();

        let question = match self.sanitizer.validate_question(raw) {
            Ok(question) => question,
            Err(e) => {
                let raw_len = raw.chars().count();
                tracing::warn!(session_id = %session.id(), raw_len, "Invalid input rejected");
                audit.record_invalid_input(raw_len);
                return Err(e);
            }
        };

        if let Err(e) = session.rate_window_mut().check_and_record() {
            tracing::warn!(session_id = %session.id(), "Rate limit exceeded");
            audit.record_rate_limited();
            return Err(e);
        }

        session.acknowledge_welcome();
        session.push(ChatMessage::user(question.clone()));

        let answer = self.dispatcher.answer(&question).await;
        session.push(ChatMessage::assistant(answer.clone()));
        Ok(answer)
    }

    /// Clear a session's transcript
    pub fn clear(&self, session: &mut Session) {
        tracing::debug!(session_id = %session.id(), "Transcript cleared");
        session.clear_transcript();
    }
}
