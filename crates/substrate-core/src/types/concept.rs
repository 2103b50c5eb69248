use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::thought::ThoughtId;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConceptId(pub String);

impl ConceptId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ConceptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Concept lifecycle stage (`spec.md` §3, §4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptStage {
    Emerging,
    Established,
    Central,
    Fading,
}

/// A directed concept-to-concept edge (semantically undirected, stored
/// directed for efficiency — see `spec.md` §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptEdge {
    pub target: ConceptId,
    pub weight: f64,
}

/// A persistent named cluster derived from thoughts sharing embedding
/// neighborhood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub id: ConceptId,
    pub label: String,
    pub stage: ConceptStage,
    pub centroid: Vec<f32>,
    pub members: BTreeSet<ThoughtId>,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub edges: Vec<ConceptEdge>,
    pub salience: f64,
    /// Consecutive evolution cycles this concept has had `members.len() <
    /// MIN_CLUSTER`. Reset to 0 whenever membership recovers.
    pub below_min_cycles: u32,
    /// Number of evolution cycles this concept has existed for (used by the
    /// `emerging -> established` transition, which also requires >= 2 cycles).
    pub cycles_alive: u32,
}

impl Concept {
    pub fn salience_from_activations(&self, activations: impl Iterator<Item = f64>) -> f64 {
        activations.sum()
    }
}
