//! In-memory registry of live sessions for the HTTP surface
//!
//! Each session sits behind its own async mutex. Handlers take it with
//! `try_lock`, so a request on a session that is still being answered is
//! rejected instead of queued. Sessions idle for longer than the configured
//! limit are swept whenever a new one is created.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::HoosWhoError;
use crate::security::RateWindow;
use crate::session::Session;

type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug)]
struct Entry {
    session: SharedSession,
    last_seen: DateTime<Utc>,
}

/// Registry of sessions keyed by id
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    max_requests: usize,
    window: Duration,
    idle: Duration,
}

impl SessionStore {
    /// Create an empty store
    ///
    /// # Arguments
    ///
    /// * `max_requests` - Rate limit given to each new session
    /// * `window` - Rate window length for each new session
    /// * `idle` - How long a session may go untouched before it is swept
    pub fn new(max_requests: usize, window: Duration, idle: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_requests,
            window,
            idle,
        }
    }

    /// Open a new session and return its id
    pub fn create(&self) -> String {
        self.create_at(Utc::now())
    }

    fn create_at(&self, now: DateTime<Utc>) -> String {
        let swept = self.sweep_expired_at(now);
        if swept > 0 {
            tracing::debug!(swept, "Expired idle sessions");
        }

        let session = Session::new(RateWindow::new(self.max_requests, self.window));
        let id = session.id().to_string();
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(
                id.clone(),
                Entry {
                    session: Arc::new(Mutex::new(session)),
                    last_seen: now,
                },
            );
        tracing::debug!(session_id = %id, "Session created");
        id
    }

    /// Drop sessions idle since before `now - idle`
    ///
    /// A session someone currently holds is never dropped.
    fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now - entry.last_seen < self.idle || Arc::strong_count(&entry.session) > 1
        });
        before - sessions.len()
    }

    fn get(&self, id: &str) -> std::result::Result<SharedSession, HoosWhoError> {
        self.touch_at(id, Utc::now())
    }

    fn touch_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<SharedSession, HoosWhoError> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| HoosWhoError::SessionNotFound(id.to_string()))?;
        entry.last_seen = now;
        Ok(Arc::clone(&entry.session))
    }

    /// Take exclusive access without waiting
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::SessionNotFound` for an unknown id and
    /// `HoosWhoError::SessionBusy` if a query is already in flight.
    pub fn try_lock(&self, id: &str) -> std::result::Result<OwnedSessionGuard, HoosWhoError> {
        let session = self.get(id)?;
        session
            .try_lock_owned()
            .map_err(|_| HoosWhoError::SessionBusy(id.to_string()))
    }

    /// Drop a session
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::SessionNotFound` for an unknown id
    pub fn remove(&self, id: &str) -> std::result::Result<(), HoosWhoError> {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id)
            .map(|_| tracing::debug!(session_id = %id, "Session ended"))
            .ok_or_else(|| HoosWhoError::SessionNotFound(id.to_string()))
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether there are no live sessions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive handle on one session
pub type OwnedSessionGuard = tokio::sync::OwnedMutexGuard<Session>;
