//! Trace writer: formats records and appends them without failing the caller
use std::sync::Arc;

use llm_trace_core::record::render_block;
use llm_trace_core::{Level, Record, Stage, TraceConfig, TraceError};

use crate::store::LogStore;

/// Pipeline-side handle to the store.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct TraceWriter {
    store: Arc<LogStore>,
    enabled: bool,
}

impl TraceWriter {
    pub fn new(store: Arc<LogStore>) -> Self {
        Self { store, enabled: true }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self {
            store: Arc::new(LogStore::from_config(config)),
            enabled: config.enabled,
        }
    }

    /// A writer that drops everything
    pub fn disabled(store: Arc<LogStore>) -> Self {
        Self { store, enabled: false }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one record for `stage`.
    ///
    /// An empty payload is replaced by the stage title. Failures are
    /// reported through `tracing` and discarded.
    pub fn record(&self, stage: Stage, level: Level, payload: impl Into<String>) {
        if let Err(err) = self.try_record(stage, level, payload) {
            report(&err, Some(stage));
        }
    }

    pub fn try_record(
        &self,
        stage: Stage,
        level: Level,
        payload: impl Into<String>,
    ) -> Result<(), TraceError> {
        let mut message = payload.into();
        if message.is_empty() {
            message = stage.title().to_string();
        }
        self.try_record_block(&[Record::now(level, message).with_stage(stage)])
    }

    /// Append several records as one write; they stay contiguous in the store
    pub fn record_block(&self, records: &[Record]) {
        if let Err(err) = self.try_record_block(records) {
            report(&err, records.first().and_then(|r| r.stage));
        }
    }

    pub fn try_record_block(&self, records: &[Record]) -> Result<(), TraceError> {
        if !self.enabled || records.is_empty() {
            return Ok(());
        }
        self.store.append(&render_block(records))
    }
}

fn report(err: &TraceError, stage: Option<Stage>) {
    match stage {
        Some(stage) => tracing::warn!(error = %err, stage = %stage, "dropping LLM trace record"),
        None => tracing::warn!(error = %err, "dropping LLM trace record"),
    }
}
