use serde::{Deserialize, Serialize};

use super::thought::ThoughtId;

/// The four association kinds. Stored directed; cycles and self-loops on
/// the *thought* graph are allowed (self-loops are forbidden per-edge, see
/// `Association::new`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    Semantic,
    Temporal,
    Contextual,
    Causal,
}

/// A weighted, typed edge from one thought to another.
///
/// `weight` is clamped to `(0.0, 1.0]` — zero-weight edges are dropped
/// rather than stored (see `decay`, which removes edges below `epsilon`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
    pub target: ThoughtId,
    pub weight: f64,
    pub kind: AssociationKind,
}

impl Association {
    pub fn new(target: ThoughtId, weight: f64, kind: AssociationKind) -> Self {
        Self {
            target,
            weight: weight.clamp(f64::EPSILON, 1.0),
            kind,
        }
    }
}
