use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Configuration for the Adaptive Scheduler (`spec.md` §4.E).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_secs: u64,
    pub jitter_min: f64,
    pub jitter_max: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: SCHEDULER_TICK_SECS,
            jitter_min: SCHEDULER_JITTER_MIN,
            jitter_max: SCHEDULER_JITTER_MAX,
        }
    }
}
