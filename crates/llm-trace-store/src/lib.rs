//! LLM Trace Store: the append-only debug log and everything that writes it
//!
//! # Flow
//!
//! ```text
//! TraceConfig → LogStore ─┬→ TraceWriter → RunTrace   (pipeline side)
//!                         └→ dump / tail / clear      (operator side)
//! ```
//!
//! Writers never fail the pipeline: a record that cannot be appended is
//! reported through `tracing` and dropped.

pub mod store;
pub mod tail;
pub mod writer;
pub mod payload;
pub mod run;

pub use store::LogStore;
pub use writer::TraceWriter;
pub use payload::FinalValues;
pub use run::RunTrace;

pub use llm_trace_core::{Level, Record, Stage, TraceConfig, TraceError};

/// Number of lines `tail` prints when no count is given
pub const DEFAULT_TAIL_LINES: usize = 50;
