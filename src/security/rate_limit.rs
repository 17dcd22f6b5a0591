//! Per-session rolling request window
//!
//! Each session owns one [`RateWindow`]. Nothing is shared between sessions
//! or processes, so several instances behind a load balancer each enforce
//! their own limit.

use chrono::{DateTime, Duration, Utc};

use crate::error::HoosWhoError;

/// Rolling window of accepted request timestamps
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use hooswho::security::RateWindow;
///
/// let mut window = RateWindow::new(2, Duration::hours(1));
/// let now = Utc::now();
/// assert!(window.check_and_record_at(now).is_ok());
/// assert!(window.check_and_record_at(now).is_ok());
/// assert!(window.check_and_record_at(now).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RateWindow {
    max_requests: usize,
    window: Duration,
    requests: Vec<DateTime<Utc>>,
}

impl Default for RateWindow {
    fn default() -> Self {
        Self::new(20, Duration::hours(1))
    }
}

impl RateWindow {
    /// Create an empty window
    ///
    /// # Arguments
    ///
    /// * `max_requests` - Requests accepted within any one window
    /// * `window` - Lookback length
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Vec::new(),
        }
    }

    /// Configured maximum
    pub fn limit(&self) -> usize {
        self.max_requests
    }

    /// Number of timestamps currently held (not pruned)
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether no timestamps are held
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drop entries that are a full window old or older
    fn prune(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        self.requests.retain(|&t| now - t < window);
    }

    /// Check the window at `now` and record the attempt if accepted
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::RateLimitExceeded` when the window is full.
    /// A rejected attempt is not recorded.
    pub fn check_and_record_at(
        &mut self,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), HoosWhoError> {
        self.prune(now);

        if self.requests.len() >= self.max_requests {
            return Err(HoosWhoError::RateLimitExceeded {
                limit: self.max_requests,
                message: format!(
                    "{} queries in the last {} minutes",
                    self.requests.len(),
                    self.window.num_minutes()
                ),
            });
        }

        self.requests.push(now);
        Ok(())
    }

    /// Check the window against the wall clock
    pub fn check_and_record(&mut self) -> std::result::Result<(), HoosWhoError> {
        self.check_and_record_at(Utc::now())
    }

    /// Attempts still available at `now`
    pub fn remaining_at(&mut self, now: DateTime<Utc>) -> usize {
        self.prune(now);
        self.max_requests.saturating_sub(self.requests.len())
    }

    /// Attempts still available right now
    pub fn remaining(&mut self) -> usize {
        self.remaining_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_default_limits() {
        let window = RateWindow::default();
        assert_eq!(window.limit(), 20);
        assert!(window.is_empty());
    }

    #[test]
    fn test_twenty_first_attempt_rejected() {
        let mut window = RateWindow::default();
        for i in 0..20 {
            assert!(window
                .check_and_record_at(t0() + Duration::minutes(i))
                .is_ok());
        }
        let err = window
            .check_and_record_at(t0() + Duration::minutes(30))
            .unwrap_err();
        assert!(matches!(err, HoosWhoError::RateLimitExceeded { limit: 20, .. }));
    }

    #[test]
    fn test_rejection_does_not_mutate() {
        let mut window = RateWindow::new(1, Duration::hours(1));
        window.check_and_record_at(t0()).unwrap();
        assert!(window.check_and_record_at(t0() + Duration::minutes(1)).is_err());
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_oldest_expiry_frees_exactly_one() {
        let mut window = RateWindow::default();
        for i in 0..20 {
            window
                .check_and_record_at(t0() + Duration::minutes(i))
                .unwrap();
        }

        // Only the first entry is a full hour old here.
        let later = t0() + Duration::hours(1);
        assert_eq!(window.remaining_at(later), 1);
        assert!(window.check_and_record_at(later).is_ok());
        assert!(window.check_and_record_at(later).is_err());
    }

    #[test]
    fn test_entry_just_inside_window_still_counts() {
        let mut window = RateWindow::new(1, Duration::hours(1));
        window.check_and_record_at(t0()).unwrap();
        let almost = t0() + Duration::hours(1) - Duration::seconds(1);
        assert!(window.check_and_record_at(almost).is_err());
    }

    #[test]
    fn test_all_entries_expire() {
        let mut window = RateWindow::new(3, Duration::hours(1));
        for _ in 0..3 {
            window.check_and_record_at(t0()).unwrap();
        }
        assert_eq!(window.remaining_at(t0() + Duration::hours(2)), 3);
        assert!(window.is_empty());
    }
}
