//! Run tracer: one conversation turn, stages in fixed order
//!
//! ```text
//! ======== (banner)
//! STARTING LLM PIPELINE for conversation <id>
//! User input: <text>
//! ======== (banner)
//! -------- (divider)
//! USER PROFILE:
//! <payload>
//! ...
//! ======== (banner)
//! LLM PIPELINE COMPLETED for conversation <id>
//! ======== (banner)
//! ```
//!
//! Stages may be skipped, never repeated or reordered. A stage that arrives
//! out of order is dropped and reported; the pipeline is never failed.
use std::fmt::Display;

use llm_trace_core::{Level, Record, Stage, BANNER, DIVIDER};
use serde_json::Value;

use crate::payload::{self, FinalValues};
use crate::writer::TraceWriter;

pub struct RunTrace {
    writer: TraceWriter,
    conversation_id: String,
    last: Option<Stage>,
}

impl RunTrace {
    /// Open a run and write its pipeline-start block
    pub fn start(writer: &TraceWriter, conversation_id: impl Display, user_input: &str) -> Self {
        let mut run = Self {
            writer: writer.clone(),
            conversation_id: conversation_id.to_string(),
            last: None,
        };
        let heading = format!(
            "{} for conversation {}",
            Stage::PipelineStart.title(),
            run.conversation_id
        );
        let input = format!("User input: {}", user_input);
        run.banner_block(Stage::PipelineStart, heading, Some(input));
        run
    }

    /// Last stage written, if any
    pub fn last_stage(&self) -> Option<Stage> {
        self.last
    }

    pub fn is_complete(&self) -> bool {
        self.last == Some(Stage::PipelineCompletion)
    }

    pub fn user_profile(&mut self, profile: &str) {
        self.stage(Stage::UserProfile, Level::Info, profile);
    }

    pub fn user_memories<S: AsRef<str>>(&mut self, memories: &[S]) {
        self.stage(Stage::UserMemories, Level::Info, &payload::memories(memories));
    }

    pub fn vector_search_query(&mut self, query: &str) {
        self.stage(Stage::VectorSearchQuery, Level::Info, query);
    }

    pub fn retrieved_context<S: AsRef<str>>(&mut self, documents: &[S]) {
        self.stage(Stage::RetrievedContext, Level::Info, &payload::documents(documents));
    }

    pub fn full_prompt(&mut self, prompt: &str) {
        self.stage(Stage::FullPrompt, Level::Info, prompt);
    }

    pub fn raw_llm_response(&mut self, raw: &str) {
        self.stage(Stage::RawLlmResponse, Level::Info, raw);
    }

    pub fn cleaned_response(&mut self, cleaned: &str) {
        self.stage(Stage::CleanedResponse, Level::Info, cleaned);
    }

    pub fn parsed_json(&mut self, parsed: &Value) {
        self.stage(Stage::ParsedJson, Level::Info, &payload::json(parsed));
    }

    /// The model output could not be parsed; takes the parsed-json slot
    pub fn parse_failure(&mut self, error: impl Display) {
        let message = format!("Failed to parse LLM output as JSON: {}", error);
        self.stage(Stage::ParsedJson, Level::Warning, &message);
    }

    pub fn final_values(&mut self, values: &FinalValues) {
        self.stage(Stage::FinalValues, Level::Info, &values.render());
    }

    /// Close the run with the completion banner
    pub fn complete(&mut self) {
        let heading = format!(
            "{} for conversation {}",
            Stage::PipelineCompletion.title(),
            self.conversation_id
        );
        self.banner_block(Stage::PipelineCompletion, heading, None);
    }

    /// Write a divider, the stage title and the payload as one block
    pub fn stage(&mut self, stage: Stage, level: Level, body: &str) {
        if matches!(stage, Stage::PipelineStart | Stage::PipelineCompletion) {
            tracing::warn!(
                stage = %stage,
                conversation = %self.conversation_id,
                "banner stages are written by start/complete"
            );
            return;
        }
        if !self.admit(stage) {
            return;
        }
        let title = format!("{}:", stage.title());
        self.writer.record_block(&[
            Record::now(Level::Info, DIVIDER).with_stage(stage),
            Record::now(level, title).with_stage(stage),
            Record::now(level, payload::or_empty(body)).with_stage(stage),
        ]);
    }

    fn banner_block(&mut self, stage: Stage, heading: String, detail: Option<String>) {
        if !self.admit(stage) {
            return;
        }
        let mut records = vec![
            Record::now(Level::Info, BANNER).with_stage(stage),
            Record::now(Level::Info, heading).with_stage(stage),
        ];
        if let Some(detail) = detail {
            records.push(Record::now(Level::Info, detail).with_stage(stage));
        }
        records.push(Record::now(Level::Info, BANNER).with_stage(stage));
        self.writer.record_block(&records);
    }

    fn admit(&mut self, stage: Stage) -> bool {
        let in_order = match self.last {
            None => stage == Stage::PipelineStart,
            Some(last) => stage > last,
        };
        if !in_order {
            tracing::warn!(
                stage = %stage,
                last = ?self.last.map(|s| s.name()),
                conversation = %self.conversation_id,
                "out-of-order trace stage dropped"
            );
            return false;
        }
        self.last = Some(stage);
        true
    }
}

impl Drop for RunTrace {
    fn drop(&mut self) {
        if self.last.is_some() && !self.is_complete() {
            tracing::warn!(
                last = ?self.last_stage().map(|s| s.name()),
                conversation = %self.conversation_id,
                "trace run dropped before pipeline completion"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LogStore;
    use std::sync::Arc;

    fn temp_writer() -> (tempfile::TempDir, TraceWriter) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LogStore::new(dir.path().join("llm_debug.log")));
        (dir, TraceWriter::new(store))
    }

    /// Message part of each physical line, timestamps stripped
    fn messages(writer: &TraceWriter) -> Vec<String> {
        writer
            .store()
            .contents()
            .unwrap()
            .lines()
            .map(|line| match line.splitn(3, " - ").nth(2) {
                Some(msg) if line.len() > 19 && line.as_bytes()[4] == b'-' => msg.to_string(),
                _ => line.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_start_block() {
        let (_dir, writer) = temp_writer();
        let run = RunTrace::start(&writer, 15, "How can I manage my study schedule better?");
        assert_eq!(run.last_stage(), Some(Stage::PipelineStart));
        assert_eq!(
            messages(&writer),
            vec![
                BANNER.to_string(),
                "STARTING LLM PIPELINE for conversation 15".to_string(),
                "User input: How can I manage my study schedule better?".to_string(),
                BANNER.to_string(),
            ]
        );
    }

    #[test]
    fn test_stage_block_layout() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 3, "hi");
        run.user_profile("Name: Rafi\nUniversity: DU");

        let msgs = messages(&writer);
        assert_eq!(
            &msgs[4..],
            &[
                DIVIDER.to_string(),
                "USER PROFILE:".to_string(),
                "Name: Rafi".to_string(),
                "University: DU".to_string(),
            ]
        );
    }

    #[test]
    fn test_skipping_stages_is_allowed() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 1, "q");
        run.full_prompt("prompt");
        run.final_values(&FinalValues::new("r", "s"));
        run.complete();
        assert!(run.is_complete());

        let msgs = messages(&writer);
        assert!(msgs.contains(&"FULL PROMPT SENT TO LLM:".to_string()));
        assert!(msgs.contains(&"FINAL VALUES:".to_string()));
        assert_eq!(msgs.last(), Some(&BANNER.to_string()));
    }

    #[test]
    fn test_out_of_order_stage_dropped() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 1, "q");
        run.raw_llm_response("raw");
        run.user_profile("too late");
        run.raw_llm_response("again");

        let content = writer.store().contents().unwrap();
        assert!(!content.contains("too late"));
        assert!(!content.contains("again"));
        assert_eq!(run.last_stage(), Some(Stage::RawLlmResponse));
    }

    #[test]
    fn test_nothing_after_completion() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 1, "q");
        run.complete();
        let before = writer.store().contents().unwrap();
        run.final_values(&FinalValues::new("late", "late"));
        run.complete();
        assert_eq!(writer.store().contents().unwrap(), before);
    }

    #[test]
    fn test_banner_stages_rejected_through_stage() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 1, "q");
        run.stage(Stage::PipelineCompletion, Level::Info, "sneaky");
        assert!(!run.is_complete());
        assert!(!writer.store().contents().unwrap().contains("sneaky"));
    }

    #[test]
    fn test_parse_failure_is_warning() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 8, "q");
        run.cleaned_response("not json");
        run.parse_failure("expected value at line 1 column 1");

        let content = writer.store().contents().unwrap();
        assert!(content.contains(" - WARNING - PARSED JSON:\n"));
        assert!(content.contains(
            " - WARNING - Failed to parse LLM output as JSON: expected value at line 1 column 1\n"
        ));
    }

    #[test]
    fn test_empty_payload_marked() {
        let (_dir, writer) = temp_writer();
        let mut run = RunTrace::start(&writer, 2, "q");
        run.cleaned_response("");
        assert!(writer.store().contents().unwrap().contains(" - INFO - (empty)\n"));
    }
}
