//! Pipeline stages, in the order a run records them
use serde::{Deserialize, Serialize};

/// A named checkpoint of one pipeline run.
///
/// Variants are declared in run order; `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    PipelineStart,
    UserProfile,
    UserMemories,
    VectorSearchQuery,
    RetrievedContext,
    FullPrompt,
    RawLlmResponse,
    CleanedResponse,
    ParsedJson,
    FinalValues,
    PipelineCompletion,
}

impl Stage {
    /// Every stage, in run order
    pub const ALL: [Stage; 11] = [
        Stage::PipelineStart,
        Stage::UserProfile,
        Stage::UserMemories,
        Stage::VectorSearchQuery,
        Stage::RetrievedContext,
        Stage::FullPrompt,
        Stage::RawLlmResponse,
        Stage::CleanedResponse,
        Stage::ParsedJson,
        Stage::FinalValues,
        Stage::PipelineCompletion,
    ];

    /// Stable kebab-case name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::PipelineStart => "pipeline-start",
            Stage::UserProfile => "user-profile",
            Stage::UserMemories => "user-memories",
            Stage::VectorSearchQuery => "vector-search-query",
            Stage::RetrievedContext => "retrieved-context",
            Stage::FullPrompt => "full-prompt",
            Stage::RawLlmResponse => "raw-llm-response",
            Stage::CleanedResponse => "cleaned-response",
            Stage::ParsedJson => "parsed-json",
            Stage::FinalValues => "final-values",
            Stage::PipelineCompletion => "pipeline-completion",
        }
    }

    /// Heading written into the log for this stage
    pub fn title(&self) -> &'static str {
        match self {
            Stage::PipelineStart => "STARTING LLM PIPELINE",
            Stage::UserProfile => "USER PROFILE",
            Stage::UserMemories => "USER MEMORIES",
            Stage::VectorSearchQuery => "VECTOR SEARCH QUERY",
            Stage::RetrievedContext => "RETRIEVED CONTEXT",
            Stage::FullPrompt => "FULL PROMPT SENT TO LLM",
            Stage::RawLlmResponse => "RAW LLM RESPONSE",
            Stage::CleanedResponse => "CLEANED RESPONSE",
            Stage::ParsedJson => "PARSED JSON",
            Stage::FinalValues => "FINAL VALUES",
            Stage::PipelineCompletion => "LLM PIPELINE COMPLETED",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
