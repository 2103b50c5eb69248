/// Errors surfaced by pluggable backends (embedding providers, LLM calls).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("embedding backend '{name}' unavailable: {reason}")]
    EmbeddingUnavailable { name: String, reason: String },

    #[error("llm backend call failed: {reason}")]
    LlmCallFailed { reason: String },

    #[error("backend returned malformed output: {reason}")]
    MalformedOutput { reason: String },
}
