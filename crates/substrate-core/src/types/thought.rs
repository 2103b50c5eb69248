use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::association::Association;
use super::value::Value;

/// A thought's stable identifier. Opaque to callers, unique within a substrate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThoughtId(pub String);

impl ThoughtId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ThoughtId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThoughtId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThoughtId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The open set of thought types. `Custom` lets callers register their own
/// job-driven kinds (see S4 in the test scenarios) without a core change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThoughtType {
    Reflection,
    Dream,
    Monologue,
    Existential,
    Pulse,
    User,
    Dialogue,
    Custom(String),
}

impl ThoughtType {
    /// The key used to look up prompt patterns and scheduler jobs.
    pub fn key(&self) -> &str {
        match self {
            ThoughtType::Reflection => "reflection",
            ThoughtType::Dream => "dream",
            ThoughtType::Monologue => "monologue",
            ThoughtType::Existential => "existential",
            ThoughtType::Pulse => "pulse",
            ThoughtType::User => "user",
            ThoughtType::Dialogue => "dialogue",
            ThoughtType::Custom(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for ThoughtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A unit of generated or received text with metadata — the atom of memory.
///
/// Content never mutates after `save`; activation and associations do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub thought_type: ThoughtType,
    /// Which job or caller produced this thought (e.g. "dream", "user").
    pub origin: String,
    /// Current relevance, clamped to [0.0, 1.0].
    pub activation: f64,
    pub last_accessed: DateTime<Utc>,
    pub parent_id: Option<ThoughtId>,
    pub associations: Vec<Association>,
    /// Caller-supplied open-ended metadata (focus, tags, provenance, ...).
    pub metadata: Value,
    /// blake3 hash of `content`, computed once at save time.
    pub content_hash: String,
}

impl Thought {
    pub fn new(
        content: impl Into<String>,
        thought_type: ThoughtType,
        origin: impl Into<String>,
        metadata: Value,
        now: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let content_hash = blake3::hash(content.as_bytes()).to_hex().to_string();
        Self {
            id: ThoughtId::new(),
            content,
            created_at: now,
            thought_type,
            origin: origin.into(),
            activation: 1.0,
            last_accessed: now,
            parent_id: None,
            associations: Vec::new(),
            metadata,
            content_hash,
        }
    }

    /// Clamp activation into [0.0, 1.0]. Called after every mutation.
    pub fn clamp_activation(&mut self) {
        self.activation = self.activation.clamp(0.0, 1.0);
    }
}
