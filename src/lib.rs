//! Hoos Who - classmate finder library
//!
//! Answers natural-language questions about a cohort directory by sending the
//! whole directory plus the question to the Anthropic Messages API.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `directory`: CSV-backed student records and company listings
//! - `security`: input sanitizer, per-session rate window, audit log
//! - `prompts`: system prompt and user prompt construction
//! - `providers`: chat-completion provider abstraction (Anthropic, fake)
//! - `dispatcher`: one fail-soft upstream call per question
//! - `session`: per-session state and the session registry
//! - `assistant`: the chat pipeline tying the above together
//! - `commands`: terminal command handlers
//! - `server`: JSON HTTP surface
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hooswho::{Assistant, Config, Directory};
//! use hooswho::config::ApiKey;
//! use hooswho::providers::create_provider;
//! use hooswho::security::AuditLog;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider, ApiKey::from_env()?)?;
//!     let directory = Arc::new(Directory::load(&config.directory.path)?);
//!     let audit = Arc::new(AuditLog::open(&config.audit.log_path)?);
//!     let assistant = Assistant::from_config(&config, provider, directory, audit)?;
//!
//!     let mut session = assistant.new_session();
//!     println!("{}", assistant.submit(&mut session, "Who works at ICF?").await?);
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod security;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use assistant::Assistant;
pub use config::Config;
pub use directory::{Directory, StudentRecord};
pub use error::{HoosWhoError, Result};
pub use session::{Session, SessionStore};
