use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternId(pub String);

impl PatternId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for PatternId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prompt template with named placeholders (`{{variable}}`), keyed by
/// thought type, scored by an EWMA of feedback signal (`spec.md` §4.D).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptPattern {
    pub id: PatternId,
    pub thought_type: String,
    pub template: String,
    /// The pattern this one was derived from by `evolve`, or `None` for seeds.
    pub parent_id: Option<PatternId>,
    pub usage_count: u64,
    /// EWMA of feedback signal, in [0.0, 1.0].
    pub success_score: f64,
    pub created_at: DateTime<Utc>,
    /// Seed patterns are immutable and are never retired.
    pub is_seed: bool,
}

impl PromptPattern {
    pub fn seed(
        thought_type: impl Into<String>,
        template: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PatternId::new(),
            thought_type: thought_type.into(),
            template: template.into(),
            parent_id: None,
            usage_count: 0,
            success_score: 0.5,
            created_at: now,
            is_seed: true,
        }
    }
}
