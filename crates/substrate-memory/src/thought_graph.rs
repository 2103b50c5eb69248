//! Thought association graph, grounded on `cortex-causal`'s `IndexedGraph` /
//! `petgraph::Direction` neighbor traversal, generalized from depth-1 causal
//! neighbors to bounded-depth spreading activation.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use substrate_core::{Association, AssociationKind, ThoughtId};

#[derive(Debug, Clone)]
pub struct Edge {
    pub weight: f64,
    pub kind: AssociationKind,
}

/// Directed graph over thought ids. Edge weight mirrors `Association::weight`.
#[derive(Debug, Default)]
pub struct ThoughtGraph {
    graph: StableDiGraph<ThoughtId, Edge>,
    index: HashMap<ThoughtId, NodeIndex>,
}

impl ThoughtGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_node(&mut self, id: &ThoughtId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    pub fn upsert_edge(&mut self, source: &ThoughtId, target: &ThoughtId, assoc: &Association) {
        let s = self.ensure_node(source);
        let t = self.ensure_node(&assoc.target);
        debug_assert_eq!(&assoc.target, target);
        if let Some(existing) = self.graph.find_edge(s, t) {
            self.graph[existing].weight = assoc.weight;
            self.graph[existing].kind = assoc.kind;
        } else {
            self.graph.add_edge(
                s,
                t,
                Edge {
                    weight: assoc.weight,
                    kind: assoc.kind,
                },
            );
        }
    }

    /// Outgoing associations for `id`.
    pub fn outgoing(&self, id: &ThoughtId) -> Vec<(ThoughtId, Edge)> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| {
                let e = self.graph.find_edge(idx, n)?;
                Some((self.graph[n].clone(), self.graph[e].clone()))
            })
            .collect()
    }

    /// Remove edges with weight below `epsilon` (used by decay).
    pub fn prune_weak_edges(&mut self, epsilon: f64) {
        let weak: Vec<_> = self
            .graph
            .edge_indices()
            .filter(|&e| self.graph[e].weight < epsilon)
            .collect();
        for e in weak {
            self.graph.remove_edge(e);
        }
    }

    /// Apply `f` to every edge weight touching `id` (outgoing and incoming).
    pub fn scale_edges_from(&mut self, id: &ThoughtId, f: impl Fn(f64) -> f64) {
        let Some(&idx) = self.index.get(id) else {
            return;
        };
        let out: Vec<_> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.find_edge(idx, n))
            .collect();
        for e in out {
            self.graph[e].weight = f(self.graph[e].weight);
        }
    }

    /// Bounded-depth breadth-first traversal with per-hop damping, used by
    /// spreading-activation retrieval (`spec.md` §4.B).
    pub fn spread(&self, origin: &ThoughtId, max_depth: u32, damping: f64) -> HashMap<ThoughtId, f64> {
        let mut scores: HashMap<ThoughtId, f64> = HashMap::new();
        let Some(&start) = self.index.get(origin) else {
            return scores;
        };
        scores.insert(origin.clone(), 1.0);

        let mut frontier: Vec<(NodeIndex, f64)> = vec![(start, 1.0)];
        let mut visited_depth: HashMap<NodeIndex, u32> = HashMap::new();
        visited_depth.insert(start, 0);

        for depth in 1..=max_depth {
            let mut next_frontier = Vec::new();
            for (node, incoming_score) in &frontier {
                for neighbor in self.graph.neighbors_directed(*node, Direction::Outgoing) {
                    if visited_depth.contains_key(&neighbor) {
                        continue;
                    }
                    let Some(edge) = self.graph.find_edge(*node, neighbor) else {
                        continue;
                    };
                    let propagated = incoming_score * self.graph[edge].weight * damping;
                    let id = self.graph[neighbor].clone();
                    let entry = scores.entry(id).or_insert(0.0);
                    *entry += propagated;
                    next_frontier.push((neighbor, propagated));
                    visited_depth.insert(neighbor, depth);
                }
            }
            frontier = next_frontier;
            if frontier.is_empty() {
                break;
            }
        }

        scores
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use substrate_core::Association;

    fn assoc(target: &str, weight: f64) -> Association {
        Association::new(ThoughtId::from(target), weight, AssociationKind::Semantic)
    }

    #[test]
    fn spread_decays_with_depth() {
        let _ = Utc::now();
        let mut g = ThoughtGraph::new();
        let a = ThoughtId::from("a");
        let b = ThoughtId::from("b");
        let c = ThoughtId::from("c");
        g.upsert_edge(&a, &b, &assoc("b", 0.8));
        g.upsert_edge(&b, &c, &assoc("c", 0.8));

        let scores = g.spread(&a, 2, 0.5);
        assert!(scores.contains_key(&b));
        assert!(scores.contains_key(&c));
        assert!(scores[&b] > scores[&c]);
    }

    #[test]
    fn prune_weak_edges_removes_below_epsilon() {
        let mut g = ThoughtGraph::new();
        let a = ThoughtId::from("a");
        let b = ThoughtId::from("b");
        g.upsert_edge(&a, &b, &assoc("b", 0.01));
        g.prune_weak_edges(0.05);
        assert!(g.outgoing(&a).is_empty());
    }
}
