//! Text bodies for the typed stages
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const NO_MEMORIES: &str = "No memories stored.";
pub(crate) const NO_CONTEXT: &str = "No relevant information found.";
pub(crate) const EMPTY_PAYLOAD: &str = "(empty)";

/// Fields the pipeline extracts from the parsed model output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalValues {
    pub reply: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl FinalValues {
    pub fn new(reply: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            summary: summary.into(),
            memory: None,
        }
    }

    pub fn with_memory(mut self, memory: impl Into<String>) -> Self {
        self.memory = Some(memory.into());
        self
    }

    pub(crate) fn render(&self) -> String {
        format!(
            "Reply: {}\nSummary: {}\nMemory: {}",
            self.reply,
            self.summary,
            self.memory.as_deref().unwrap_or("(none)")
        )
    }
}

pub(crate) fn memories<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return NO_MEMORIES.to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}. {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn documents<S: AsRef<str>>(docs: &[S]) -> String {
    if docs.is_empty() {
        return NO_CONTEXT.to_string();
    }
    docs.iter()
        .enumerate()
        .map(|(i, d)| format!("Context {}: {}", i + 1, d.as_ref()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) fn json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub(crate) fn or_empty(text: &str) -> &str {
    if text.is_empty() {
        EMPTY_PAYLOAD
    } else {
        text
    }
}
