use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Configuration for the Dynamic Prompt Store (`spec.md` §4.D).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub ewma_beta: f64,
    pub evolve_threshold: f64,
    pub inheritance_factor: f64,
    pub retirement_selections: u64,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            ewma_beta: PATTERN_EWMA_BETA,
            evolve_threshold: PATTERN_EVOLVE_THRESHOLD,
            inheritance_factor: PATTERN_INHERITANCE_FACTOR,
            retirement_selections: PATTERN_RETIREMENT_SELECTIONS,
        }
    }
}
