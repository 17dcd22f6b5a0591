//! Append-only audit log of query metadata
//!
//! Each line is `<RFC 3339 timestamp> - <LEVEL> - <message>`. Only lengths
//! and outcomes are recorded, never question or answer text. The log is
//! advisory: a failed write is reported through `tracing` and otherwise
//! ignored.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

use crate::error::Result;

/// Severity of an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Append-only audit log file
pub struct AuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog").field("path", &self.path).finish()
    }
}

impl AuditLog {
    /// Open (or create) the log for appending
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!("Audit log opened at {}", path.display());
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, level: AuditLevel, message: &str) {
        let line = format!(
            "{} - {} - {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message
        );

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            tracing::warn!("Failed to write audit log {}: {}", self.path.display(), e);
        }
    }

    /// Record the outcome of one upstream query
    ///
    /// Lengths are in characters.
    pub fn record_query(&self, question_len: usize, response_len: usize, success: bool) {
        let status = if success { "SUCCESS" } else { "FAILED" };
        self.write_line(
            AuditLevel::Info,
            &format!(
                "Query - Status: {}, Query Length: {}, Response Length: {}",
                status, question_len, response_len
            ),
        );
    }

    /// Record input rejected by validation
    pub fn record_invalid_input(&self, raw_len: usize) {
        self.write_line(
            AuditLevel::Warning,
            &format!("Invalid input rejected - length: {}", raw_len),
        );
    }

    /// Record a rate limit rejection
    pub fn record_rate_limited(&self) {
        self.write_line(AuditLevel::Warning, "Rate limit exceeded");
    }

    /// Record the cause of an upstream failure
    pub fn record_upstream_error(&self, cause: &str) {
        self.write_line(AuditLevel::Error, &format!("API Error: {}", cause));
    }

    /// Record that the service could not start for lack of a credential
    pub fn record_missing_credentials(&self) {
        self.write_line(
            AuditLevel::Error,
            "API key missing - application cannot function",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_level_display() {
        assert_eq!(AuditLevel::Info.to_string(), "INFO");
        assert_eq!(AuditLevel::Warning.to_string(), "WARNING");
        assert_eq!(AuditLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_record_query_success_line() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::open(dir.path().join("audit.log")).unwrap();
        log.record_query(17, 240, true);

        let lines = read_lines(log.path());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - INFO - "));
        assert!(lines[0]
            .ends_with("Query - Status: SUCCESS, Query Length: 17, Response Length: 240"));
    }

    #[test]
    fn test_record_query_failure_line() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::open(dir.path().join("audit.log")).unwrap();
        log.record_query(17, 0, false);
        let lines = read_lines(log.path());
        assert!(lines[0].contains("Status: FAILED"));
        assert!(lines[0].contains("Response Length: 0"));
    }

    #[test]
    fn test_appends_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        AuditLog::open(&path).unwrap().record_rate_limited();
        AuditLog::open(&path).unwrap().record_invalid_input(2);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("WARNING - Rate limit exceeded"));
        assert!(lines[1].ends_with("WARNING - Invalid input rejected - length: 2"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/nested/audit.log");
        let log = AuditLog::open(&path).unwrap();
        log.record_missing_credentials();
        assert!(read_lines(&path)[0].contains("ERROR - API key missing"));
    }

    #[test]
    fn test_timestamp_prefix_is_rfc3339() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::open(dir.path().join("audit.log")).unwrap();
        log.record_upstream_error("status 529");
        let line = &read_lines(log.path())[0];
        let stamp = line.split(" - ").next().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(line.ends_with("ERROR - API Error: status 529"));
    }
}
