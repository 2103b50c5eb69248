//! Shared types, configuration, errors, and cross-crate traits for the
//! cognitive substrate, mirroring the role `cortex-core` plays for the
//! `cortex` workspace.

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;
pub mod types;

pub use config::SubstrateConfig;
pub use errors::{SubstrateError, SubstrateResult};
pub use traits::EmbeddingProvider;
pub use types::{
    Association, AssociationKind, Concept, ConceptEdge, ConceptId, ConceptStage, JobState,
    JobStatus, Mood, PatternId, PromptPattern, Scalar, SchedulerState, Thought, ThoughtId,
    ThoughtType, Value,
};
