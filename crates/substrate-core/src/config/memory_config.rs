use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Configuration for the Emergent Memory subsystem (`spec.md` §4.B).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub semantic_similarity_threshold: f32,
    pub semantic_top_m: usize,
    pub temporal_top_t: usize,
    pub temporal_mix: f64,
    pub activation_weight_alpha: f64,
    pub spreading_damping: f64,
    pub spreading_max_depth: u32,
    pub reinforcement_boost: f64,
    pub activation_half_life_days: f64,
    pub association_half_life_days: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            semantic_similarity_threshold: SEMANTIC_SIMILARITY_THRESHOLD,
            semantic_top_m: SEMANTIC_TOP_M,
            temporal_top_t: TEMPORAL_TOP_T,
            temporal_mix: DEFAULT_TEMPORAL_MIX,
            activation_weight_alpha: ACTIVATION_WEIGHT_ALPHA,
            spreading_damping: SPREADING_DAMPING,
            spreading_max_depth: SPREADING_MAX_DEPTH,
            reinforcement_boost: REINFORCEMENT_BOOST,
            activation_half_life_days: ACTIVATION_HALF_LIFE_DAYS,
            association_half_life_days: ASSOCIATION_HALF_LIFE_DAYS,
        }
    }
}
