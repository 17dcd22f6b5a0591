//! In-process fake provider for unit and integration tests
//!
//! [`FakeProvider`] answers from a queue of scripted outcomes and records
//! every request it receives, so tests can assert on the exact payload sent
//! upstream without any network I/O.
//!
//! # Example
//!
//! ```
//! use hooswho::providers::{ChatMessage, CompletionRequest, FakeProvider, Provider};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let fake = FakeProvider::new();
//! fake.push_reply("Jane Doe works at ICF.");
//!
//! let request = CompletionRequest {
//!     system: "sys".to_string(),
//!     messages: vec![ChatMessage::user("Who works at ICF?")],
//!     max_tokens: 10,
//! };
//! let response = fake.complete(&request).await.unwrap();
//! assert_eq!(response.text, "Jane Doe works at ICF.");
//! assert_eq!(fake.requests().len(), 1);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{HoosWhoError, Result};
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Scripted outcome for one call
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
    Hang(Duration),
}

/// Provider double with scripted outcomes
///
/// Clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FakeProvider {
    /// Create a fake with an empty script
    ///
    /// Calls made with nothing scripted fail.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, outcome: Scripted) {
        self.script
            .lock()
            .expect("fake provider script lock poisoned")
            .push_back(outcome);
    }

    /// Queue a successful reply
    pub fn push_reply(&self, text: impl Into<String>) {
        self.push(Scripted::Reply(text.into()));
    }

    /// Queue a failure with the given cause
    pub fn push_failure(&self, cause: impl Into<String>) {
        self.push(Scripted::Fail(cause.into()));
    }

    /// Queue a call that sleeps before replying
    pub fn push_hang(&self, duration: Duration) {
        self.push(Scripted::Hang(duration));
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .expect("fake provider request lock poisoned")
            .clone()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .expect("fake provider request lock poisoned")
            .push(request.clone());

        let next = self
            .script
            .lock()
            .expect("fake provider script lock poisoned")
            .pop_front();

        match next {
            Some(Scripted::Reply(text)) => Ok(CompletionResponse::new(text)),
            Some(Scripted::Fail(cause)) => Err(HoosWhoError::Provider(cause).into()),
            Some(Scripted::Hang(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(CompletionResponse::new("late reply"))
            }
            None => Err(HoosWhoError::Provider("no scripted reply".to_string()).into()),
        }
    }

    fn model(&self) -> String {
        "fake".to_string()
    }
}
