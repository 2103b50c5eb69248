/// Errors from the dynamic prompt store (`spec.md` §4.D, §7).
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("no pattern registered for thought type '{thought_type}'")]
    NoPatternForType { thought_type: String },

    #[error("template '{template}' is missing placeholder '{placeholder}'")]
    PlaceholderMismatch {
        template: String,
        placeholder: String,
    },

    #[error("context does not satisfy pattern requirements: {reason}")]
    ContextMismatch { reason: String },
}
