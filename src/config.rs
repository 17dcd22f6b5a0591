//! Configuration management for Hoos Who
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! The Anthropic credential is deliberately not part of [`Config`]: it is
//! read from the process environment only, through [`ApiKey::from_env`].

use crate::error::{HoosWhoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable holding the Anthropic API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Longest accepted rate window or session idle timeout (30 days)
pub const MAX_WINDOW_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Main configuration structure for Hoos Who
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Anthropic provider settings
    #[serde(default)]
    pub provider: AnthropicConfig,
    /// Student directory settings
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Sanitizer and rate limit settings
    #[serde(default)]
    pub security: SecurityConfig,
    /// Audit log settings
    #[serde(default)]
    pub audit: AuditConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Anthropic Messages API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Model to use for answers
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Maximum output tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single upstream call (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout() -> u64 {
    60
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Student directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Path to the student CSV
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// How many featured classmates to sample
    #[serde(default = "default_featured_count")]
    pub featured_count: usize,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("student_data.csv")
}

fn default_featured_count() -> usize {
    3
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            featured_count: default_featured_count(),
        }
    }
}

/// Input hygiene and rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Sanitized input is truncated to this many characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Questions shorter than this after sanitization are rejected
    #[serde(default = "default_min_question_chars")]
    pub min_question_chars: usize,

    /// Maximum accepted queries per session within the window
    #[serde(default = "default_rate_limit")]
    pub max_queries_per_window: usize,

    /// Rolling window length (seconds)
    #[serde(default = "default_rate_window")]
    pub rate_window_seconds: i64,
}

fn default_max_input_chars() -> usize {
    500
}

fn default_min_question_chars() -> usize {
    3
}

fn default_rate_limit() -> usize {
    20
}

fn default_rate_window() -> i64 {
    3600
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            min_question_chars: default_min_question_chars(),
            max_queries_per_window: default_rate_limit(),
            rate_window_seconds: default_rate_window(),
        }
    }
}

impl SecurityConfig {
    /// Rolling window length for per-session rate limits
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::Config` if the value is not in `1..=MAX_WINDOW_SECONDS`
    pub fn rate_window(&self) -> std::result::Result<chrono::Duration, HoosWhoError> {
        window_duration("security.rate_window_seconds", self.rate_window_seconds)
    }
}

fn window_duration(
    name: &str,
    seconds: i64,
) -> std::result::Result<chrono::Duration, HoosWhoError> {
    if seconds <= 0 || seconds > MAX_WINDOW_SECONDS {
        return Err(HoosWhoError::Config(format!(
            "{} must be between 1 and {}: {}",
            name, MAX_WINDOW_SECONDS, seconds
        )));
    }
    chrono::Duration::try_seconds(seconds)
        .ok_or_else(|| HoosWhoError::Config(format!("{} is out of range: {}", name, seconds)))
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Append-only audit log file
    #[serde(default = "default_audit_path")]
    pub log_path: PathBuf,
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("hoos_who_audit.log")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: default_audit_path(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Sessions untouched for this long are dropped (seconds)
    #[serde(default = "default_session_idle")]
    pub session_idle_seconds: i64,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_session_idle() -> i64 {
    2 * 60 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            session_idle_seconds: default_session_idle(),
        }
    }
}

impl ServerConfig {
    /// Idle timeout for HTTP sessions
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::Config` if the value is outside the representable range
    pub fn session_idle(&self) -> std::result::Result<chrono::Duration, HoosWhoError> {
        window_duration("server.session_idle_seconds", self.session_idle_seconds)
    }
}

/// Anthropic API key read from the environment
///
/// `Debug` is redacted so the key never reaches a log line.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap an explicit key value
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from `ANTHROPIC_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::MissingCredentials` when the variable is unset
    /// or blank.
    pub fn from_env() -> std::result::Result<Self, HoosWhoError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self(key.trim().to_string())),
            _ => Err(HoosWhoError::MissingCredentials(API_KEY_ENV.to_string())),
        }
    }

    /// The raw key, for the request header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Config {
    /// Load configuration from file, environment variables, and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, applied last
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| HoosWhoError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| HoosWhoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("HOOSWHO_MODEL") {
            self.provider.model = model;
        }

        if let Ok(api_base) = std::env::var("HOOSWHO_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(max_tokens) = std::env::var("HOOSWHO_MAX_TOKENS") {
            if let Ok(value) = max_tokens.parse() {
                self.provider.max_tokens = value;
            } else {
                tracing::warn!("Invalid HOOSWHO_MAX_TOKENS: {}", max_tokens);
            }
        }

        if let Ok(timeout) = std::env::var("HOOSWHO_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid HOOSWHO_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(path) = std::env::var("HOOSWHO_DATA_PATH") {
            self.directory.path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("HOOSWHO_AUDIT_LOG") {
            self.audit.log_path = PathBuf::from(path);
        }

        if let Ok(limit) = std::env::var("HOOSWHO_RATE_LIMIT") {
            if let Ok(value) = limit.parse() {
                self.security.max_queries_per_window = value;
            } else {
                tracing::warn!("Invalid HOOSWHO_RATE_LIMIT: {}", limit);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(data) = &cli.data {
            self.directory.path = data.clone();
        }

        if let Some(audit_log) = &cli.audit_log {
            self.audit.log_path = audit_log.clone();
        }

        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }

        if let crate::cli::Commands::Serve {
            bind: Some(bind), ..
        } = &cli.command
        {
            self.server.bind = bind.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(HoosWhoError::Config("provider.model cannot be empty".to_string()).into());
        }

        if !self.provider.api_base.starts_with("http://")
            && !self.provider.api_base.starts_with("https://")
        {
            return Err(HoosWhoError::Config(format!(
                "provider.api_base must be an http(s) URL: {}",
                self.provider.api_base
            ))
            .into());
        }

        if self.provider.max_tokens == 0 {
            return Err(HoosWhoError::Config(
                "provider.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.timeout_seconds == 0 {
            return Err(HoosWhoError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.security.max_input_chars == 0 {
            return Err(HoosWhoError::Config(
                "security.max_input_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.security.min_question_chars > self.security.max_input_chars {
            return Err(HoosWhoError::Config(
                "security.min_question_chars cannot exceed security.max_input_chars".to_string(),
            )
            .into());
        }

        if self.security.max_queries_per_window == 0 {
            return Err(HoosWhoError::Config(
                "security.max_queries_per_window must be greater than 0".to_string(),
            )
            .into());
        }

        self.security.rate_window()?;
        self.server.session_idle()?;

        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(HoosWhoError::Config(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            ))
            .into());
        }

        Ok(())
    }
}
