//! Log records and their line format
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::stage::Stage;

/// Opens and closes a run
pub const BANNER: &str = "================================================================================";

/// Separates stage blocks inside a run
pub const DIVIDER: &str = "--------------------------------------------------";

/// Timestamp layout, second precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity tag of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical log entry.
///
/// The message is written as-is: embedded newlines produce a multi-line
/// entry and nothing is escaped or truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub level: Level,
    pub stage: Option<Stage>,
    pub message: String,
}

impl Record {
    /// Record stamped with the local wall clock
    pub fn now(level: Level, message: impl Into<String>) -> Self {
        Self::at(Local::now().naive_local(), level, message)
    }

    /// Record with an explicit timestamp
    pub fn at(timestamp: NaiveDateTime, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            stage: None,
            message: message.into(),
        }
    }

    /// Tag the stage this record belongs to
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Render as `<timestamp> - <level> - <message>` plus a trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{} - {} - {}\n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.message
        )
    }
}

/// Concatenate records into a single buffer for one atomic append
pub fn render_block(records: &[Record]) -> String {
    records.iter().map(Record::to_line).collect()
}
