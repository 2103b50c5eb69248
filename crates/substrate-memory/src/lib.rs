//! Emergent memory: the thought store, association graph, retrieval modes,
//! and decay (`spec.md` §4.B).

pub mod decay;
pub mod retrieval;
pub mod store;
pub mod thought_graph;

pub use retrieval::{RetrievalMode, RetrievedThought};
pub use store::{AssociationEdgeRecord, MemoryStore, ThoughtsSnapshot};
pub use thought_graph::ThoughtGraph;
