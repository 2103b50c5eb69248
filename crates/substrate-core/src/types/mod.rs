pub mod association;
pub mod concept;
pub mod pattern;
pub mod scheduler;
pub mod thought;
pub mod value;

pub use association::{Association, AssociationKind};
pub use concept::{Concept, ConceptEdge, ConceptId, ConceptStage};
pub use pattern::{PatternId, PromptPattern};
pub use scheduler::{JobState, JobStatus, Mood, SchedulerState};
pub use thought::{Thought, ThoughtId, ThoughtType};
pub use value::{Scalar, Value};
