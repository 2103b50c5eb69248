use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Configuration for Concept Evolution (`spec.md` §4.C).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptConfig {
    pub min_cluster_size: usize,
    pub max_concepts_per_thought: usize,
    pub merge_threshold: f64,
    pub reconcile_threshold: f64,
    pub new_threshold: f64,
    pub fading_cycles: u32,
    pub min_cycles_for_established: u32,
}

impl Default for ConceptConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: MIN_CLUSTER_SIZE,
            max_concepts_per_thought: MAX_CONCEPTS_PER_THOUGHT,
            merge_threshold: CONCEPT_MERGE_THRESHOLD,
            reconcile_threshold: CONCEPT_RECONCILE_THRESHOLD,
            new_threshold: CONCEPT_NEW_THRESHOLD,
            fading_cycles: CONCEPT_FADING_CYCLES,
            min_cycles_for_established: CONCEPT_MIN_CYCLES_FOR_ESTABLISHED,
        }
    }
}
