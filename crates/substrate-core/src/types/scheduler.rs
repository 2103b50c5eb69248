use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bound on `JobState::recent_signals` (SPEC_FULL §4.E supplemental feature).
pub const RECENT_SIGNALS_WINDOW: usize = 5;

/// Per-job scheduler state (`spec.md` §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    pub name: String,
    pub base_interval_secs: f64,
    pub last_run: Option<DateTime<Utc>>,
    pub adapted_interval_secs: f64,
    pub recent_success: bool,
    pub run_count: u64,
    /// Ring buffer (most recent last) of the last `RECENT_SIGNALS_WINDOW`
    /// feedback signals, used to smooth the recency factor.
    pub recent_signals: VecDeque<f64>,
    /// Set by `trigger`/enqueue: bypasses the interval check exactly once.
    pub force_run_once: bool,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Idle,
    Running,
    Cancelled,
}

impl JobState {
    pub fn new(name: impl Into<String>, base_interval_secs: f64, now: DateTime<Utc>) -> Self {
        let _ = now;
        Self {
            name: name.into(),
            base_interval_secs,
            last_run: None,
            adapted_interval_secs: base_interval_secs,
            recent_success: true,
            run_count: 0,
            recent_signals: VecDeque::with_capacity(RECENT_SIGNALS_WINDOW),
            force_run_once: false,
            status: JobStatus::Idle,
        }
    }

    pub fn push_signal(&mut self, signal: f64) {
        if self.recent_signals.len() == RECENT_SIGNALS_WINDOW {
            self.recent_signals.pop_front();
        }
        self.recent_signals.push_back(signal.clamp(0.0, 1.0));
        self.recent_success = signal >= 0.5;
    }

    pub fn recent_signal_mean(&self) -> f64 {
        if self.recent_signals.is_empty() {
            0.5
        } else {
            self.recent_signals.iter().sum::<f64>() / self.recent_signals.len() as f64
        }
    }
}

/// A named-float mood vector maintained by callers, read by the interval
/// adapter (`spec.md` §3, §4.E). Dimensions default to 0.5 (neutral).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mood {
    pub dims: BTreeMap<String, f64>,
}

impl Default for Mood {
    fn default() -> Self {
        let mut dims = BTreeMap::new();
        for name in ["curiosity", "calm", "tension"] {
            dims.insert(name.to_string(), 0.5);
        }
        Self { dims }
    }
}

impl Mood {
    pub fn get(&self, dim: &str) -> f64 {
        self.dims.get(dim).copied().unwrap_or(0.5)
    }

    pub fn set(&mut self, dim: impl Into<String>, value: f64) {
        self.dims.insert(dim.into(), value.clamp(0.0, 1.0));
    }
}

/// The full persisted scheduler state (`scheduler_state.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchedulerState {
    pub jobs: BTreeMap<String, JobState>,
    pub mood: Mood,
}
