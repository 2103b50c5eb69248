//! Retrieval modes (`spec.md` §4.B): similarity, activation-weighted, and
//! spreading. Multi-factor combination is grounded on `cortex-retrieval`'s
//! `ScorerWeights`/`score()` pattern, reduced to the two factors the spec
//! names for activation-weighted retrieval.

use std::collections::HashMap;

use substrate_core::ThoughtId;

use crate::thought_graph::ThoughtGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    Similarity,
    ActivationWeighted,
    Spreading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedThought {
    pub id: ThoughtId,
    pub score: f32,
}

/// Re-rank a similarity-ranked candidate list by blending in activation:
/// `alpha * activation + (1 - alpha) * similarity`.
pub fn activation_weighted(
    candidates: Vec<(ThoughtId, f32)>,
    activations: &HashMap<ThoughtId, f64>,
    alpha: f64,
) -> Vec<RetrievedThought> {
    let mut scored: Vec<RetrievedThought> = candidates
        .into_iter()
        .map(|(id, similarity)| {
            let activation = activations.get(&id).copied().unwrap_or(0.0);
            let score = alpha * activation + (1.0 - alpha) * similarity as f64;
            RetrievedThought {
                id,
                score: score as f32,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

/// Spreading-activation retrieval: propagate the origin's activation across
/// the association graph, damped per hop, up to `max_depth` hops.
pub fn spreading(graph: &ThoughtGraph, origin: &ThoughtId, max_depth: u32, damping: f64) -> Vec<RetrievedThought> {
    let mut scored: Vec<RetrievedThought> = graph
        .spread(origin, max_depth, damping)
        .into_iter()
        .map(|(id, score)| RetrievedThought {
            id,
            score: score as f32,
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_weighted_prefers_high_activation_on_tie_similarity() {
        let mut activations = HashMap::new();
        activations.insert(ThoughtId::from("a"), 0.9);
        activations.insert(ThoughtId::from("b"), 0.1);
        let candidates = vec![(ThoughtId::from("a"), 0.5), (ThoughtId::from("b"), 0.5)];
        let ranked = activation_weighted(candidates, &activations, 0.7);
        assert_eq!(ranked[0].id, ThoughtId::from("a"));
    }
}
