//! Light security layer for the chat pipeline
//!
//! - `sanitizer`: denylist substring stripping and length capping
//! - `rate_limit`: per-session rolling request window
//! - `audit`: append-only query metadata log
//!
//! None of these are a security boundary for the model call itself. Prompt
//! injection against the model is not mitigated here.

pub mod audit;
pub mod rate_limit;
pub mod sanitizer;

pub use audit::{AuditLevel, AuditLog};
pub use rate_limit::RateWindow;
pub use sanitizer::{sanitize_input, Sanitizer, DENYLIST, MAX_RAW_BYTES};
