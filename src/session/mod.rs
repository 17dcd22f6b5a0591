//! Per-session chat state
//!
//! A [`Session`] is the explicit context object handed to the chat pipeline:
//! it owns the transcript, the rate window, and the one-time welcome flag.
//! Nothing here is global, so any number of sessions can coexist.

pub mod store;

pub use store::SessionStore;

use crate::providers::ChatMessage;
use crate::security::RateWindow;

/// State of one user's interaction
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    transcript: Vec<ChatMessage>,
    rate_window: RateWindow,
    welcome_acknowledged: bool,
}

impl Session {
    /// Create a session with a fresh random id
    pub fn new(rate_window: RateWindow) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), rate_window)
    }

    /// Create a session with a known id
    pub fn with_id(id: impl Into<String>, rate_window: RateWindow) -> Self {
        Self {
            id: id.into(),
            transcript: Vec::new(),
            rate_window,
            welcome_acknowledged: false,
        }
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Messages exchanged so far, oldest first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Append a message to the transcript
    pub fn push(&mut self, message: ChatMessage) {
        self.transcript.push(message);
    }

    /// Empty the transcript
    ///
    /// The rate window is kept: clearing history does not refund queries.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Rate window for this session
    pub fn rate_window_mut(&mut self) -> &mut RateWindow {
        &mut self.rate_window
    }

    /// Whether the career-services reminder has been dismissed
    pub fn welcome_acknowledged(&self) -> bool {
        self.welcome_acknowledged
    }

    /// Dismiss the career-services reminder
    pub fn acknowledge_welcome(&mut self) {
        self.welcome_acknowledged = true;
    }
}
