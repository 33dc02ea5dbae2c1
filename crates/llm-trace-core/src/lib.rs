//! LLM Trace Core: stages, record format, errors and configuration
//!
//! Shared vocabulary for the pipeline debug log. The store, writer and
//! operator CLI live in `llm-trace-store` and `llm-trace-cli`.
//!
//! # Record Format
//!
//! ```text
//! YYYY-MM-DD HH:MM:SS - LEVEL - MESSAGE
//! ```

pub mod stage;
pub mod record;
pub mod error;
pub mod config;

pub use stage::Stage;
pub use record::{Level, Record, BANNER, DIVIDER};
pub use error::TraceError;
pub use config::TraceConfig;

/// Default store location, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "llm_debug.log";
