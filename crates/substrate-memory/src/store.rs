//! The emergent memory store: owns thoughts, their association graph, and
//! the vector index, and implements `save`/`retrieve`/`reinforce`/`decay`
//! (`spec.md` §4.B). All mutation happens through `&mut self` — the
//! substrate facade is responsible for serializing access through the
//! single-writer event loop (`spec.md` §5).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use substrate_core::config::MemoryConfig;
use substrate_core::errors::SubstrateError;
use substrate_core::{Association, AssociationKind, EmbeddingProvider, Thought, ThoughtId, ThoughtType, Value};
use substrate_embeddings::FlatIndex;

use crate::decay::{decay_activation, decay_weight, half_life_factor};
use crate::retrieval::{activation_weighted, spreading, RetrievalMode, RetrievedThought};
use crate::thought_graph::ThoughtGraph;

pub struct MemoryStore {
    thoughts: HashMap<ThoughtId, Thought>,
    order: Vec<ThoughtId>,
    graph: ThoughtGraph,
    index: FlatIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    config: MemoryConfig,
}

/// Serializable snapshot of `thoughts.json`.
pub type ThoughtsSnapshot = Vec<Thought>;

/// Serializable snapshot of `thought_associations.json`: a flat edge list,
/// kept separate from `Thought` so the association graph can be rebuilt
/// without re-walking every thought's embedded cache.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AssociationEdgeRecord {
    pub source: ThoughtId,
    pub target: ThoughtId,
    pub weight: f64,
    pub kind: AssociationKind,
}

impl MemoryStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: MemoryConfig) -> Self {
        let dimensions = embedder.dimensions();
        let backend_name = embedder.name().to_string();
        Self {
            thoughts: HashMap::new(),
            order: Vec::new(),
            graph: ThoughtGraph::new(),
            index: FlatIndex::new(dimensions, backend_name),
            embedder,
            config,
        }
    }

    /// Rehydrate from a previously persisted snapshot (`spec.md` §6).
    pub fn restore(
        embedder: Arc<dyn EmbeddingProvider>,
        config: MemoryConfig,
        thoughts: ThoughtsSnapshot,
        edges: Vec<AssociationEdgeRecord>,
        index: FlatIndex,
    ) -> Self {
        let mut store = Self {
            thoughts: HashMap::new(),
            order: Vec::new(),
            graph: ThoughtGraph::new(),
            index,
            embedder,
            config,
        };
        for thought in thoughts {
            store.order.push(thought.id.clone());
            store.graph.ensure_node(&thought.id);
            store.thoughts.insert(thought.id.clone(), thought);
        }
        for edge in edges {
            let assoc = Association::new(edge.target.clone(), edge.weight, edge.kind);
            store.graph.upsert_edge(&edge.source, &edge.target, &assoc);
        }
        store
    }

    pub fn snapshot_thoughts(&self) -> ThoughtsSnapshot {
        self.order.iter().filter_map(|id| self.thoughts.get(id).cloned()).collect()
    }

    pub fn snapshot_edges(&self) -> Vec<AssociationEdgeRecord> {
        let mut out = Vec::new();
        for id in &self.order {
            for (target, edge) in self.graph.outgoing(id) {
                out.push(AssociationEdgeRecord {
                    source: id.clone(),
                    target,
                    weight: edge.weight,
                    kind: edge.kind,
                });
            }
        }
        out
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn get(&self, id: &ThoughtId) -> Option<&Thought> {
        self.thoughts.get(id)
    }

    pub fn recent(&self, limit: usize) -> Vec<&Thought> {
        self.order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| self.thoughts.get(id))
            .collect()
    }

    /// All thoughts with activation above `min_activation`, used by concept
    /// evolution to pick clustering candidates (`spec.md` §4.C).
    pub fn active_thoughts(&self, min_activation: f64) -> Vec<&Thought> {
        self.order
            .iter()
            .filter_map(|id| self.thoughts.get(id))
            .filter(|t| t.activation >= min_activation)
            .collect()
    }

    pub fn embedding_of(&self, id: &ThoughtId) -> Option<&[f32]> {
        self.index.vector(id)
    }

    /// Save a new thought: embed it (best-effort), establish
    /// semantic/temporal/contextual associations, and index it
    /// (`spec.md` §4.B). Embedding failure does not abort the save — the
    /// thought is persisted without a vector and is searchable only by id
    /// and metadata, per `spec.md` §4.A/§4.B.
    #[tracing::instrument(skip(self, content, metadata), fields(thought_type = ?thought_type), err)]
    pub async fn save(
        &mut self,
        content: impl Into<String>,
        thought_type: ThoughtType,
        origin: impl Into<String>,
        metadata: Value,
        now: DateTime<Utc>,
    ) -> Result<ThoughtId, SubstrateError> {
        let content = content.into();
        let embedding = match self.embedder.embed(&content).await {
            Ok(embedding) => Some(embedding),
            Err(err) => {
                tracing::warn!(error = %err, "embedding failed; persisting thought without a vector");
                None
            }
        };

        let thought = Thought::new(content, thought_type, origin, metadata, now);
        let id = thought.id.clone();

        let semantic = embedding.as_deref().map(|e| self.semantic_candidates(e, &id)).unwrap_or_default();
        let temporal = self.temporal_candidates(&id, now);
        let contextual = self.contextual_candidates(&thought, &id);

        if let Some(embedding) = embedding {
            self.index.upsert(id.clone(), embedding);
        }
        self.graph.ensure_node(&id);
        self.order.push(id.clone());
        self.thoughts.insert(id.clone(), thought);

        let mut weights: HashMap<ThoughtId, (f64, AssociationKind)> = HashMap::new();
        for (target, similarity) in semantic {
            weights.insert(target, (similarity as f64, AssociationKind::Semantic));
        }
        for (target, recency_weight) in temporal {
            weights
                .entry(target)
                .and_modify(|(w, _kind)| {
                    *w += self.config.temporal_mix * recency_weight;
                })
                .or_insert((self.config.temporal_mix * recency_weight, AssociationKind::Temporal));
        }
        for (target, overlap) in contextual {
            weights
                .entry(target)
                .and_modify(|(w, _kind)| *w += overlap)
                .or_insert((overlap, AssociationKind::Contextual));
        }

        for (target, (weight, kind)) in weights {
            let assoc = Association::new(target.clone(), weight, kind);
            self.graph.upsert_edge(&id, &target, &assoc);
            let reverse = Association::new(id.clone(), weight, kind);
            self.graph.upsert_edge(&target, &id, &reverse);
        }

        Ok(id)
    }

    fn semantic_candidates(&self, embedding: &[f32], exclude: &ThoughtId) -> Vec<(ThoughtId, f32)> {
        self.index
            .search(embedding, self.config.semantic_top_m + 1)
            .into_iter()
            .filter(|scored| &scored.id != exclude && scored.score >= self.config.semantic_similarity_threshold)
            .map(|scored| (scored.id, scored.score))
            .collect()
    }

    fn temporal_candidates(&self, exclude: &ThoughtId, now: DateTime<Utc>) -> Vec<(ThoughtId, f64)> {
        self.order
            .iter()
            .rev()
            .filter(|id| *id != exclude)
            .take(self.config.temporal_top_t)
            .filter_map(|id| {
                let thought = self.thoughts.get(id)?;
                let elapsed_days = (now - thought.created_at).num_seconds().max(0) as f64 / 86400.0;
                let weight = half_life_factor(elapsed_days, self.config.association_half_life_days);
                Some((id.clone(), weight))
            })
            .collect()
    }

    /// Thoughts sharing at least one caller-supplied metadata key/value pair
    /// with `thought`, weighted by the fraction of keys in common.
    fn contextual_candidates(&self, thought: &Thought, exclude: &ThoughtId) -> Vec<(ThoughtId, f64)> {
        let Value::Map(own) = &thought.metadata else {
            return Vec::new();
        };
        if own.is_empty() {
            return Vec::new();
        }
        self.order
            .iter()
            .rev()
            .take(self.config.temporal_top_t.max(1) * 4)
            .filter(|id| *id != exclude)
            .filter_map(|id| {
                let other = self.thoughts.get(id)?;
                let Value::Map(other_map) = &other.metadata else {
                    return None;
                };
                let shared = own.iter().filter(|(k, v)| other_map.get(*k) == Some(v)).count();
                if shared == 0 {
                    return None;
                }
                let overlap = shared as f64 / own.len() as f64;
                Some((id.clone(), overlap))
            })
            .collect()
    }

    /// Retrieve thoughts by the requested mode (`spec.md` §4.B).
    #[tracing::instrument(skip(self, query), err)]
    pub async fn retrieve(
        &self,
        mode: RetrievalMode,
        query: &str,
        origin: Option<&ThoughtId>,
        k: usize,
    ) -> Result<Vec<RetrievedThought>, SubstrateError> {
        match mode {
            RetrievalMode::Similarity => {
                let embedding = self.embedder.embed(query).await.map_err(SubstrateError::from)?;
                Ok(self
                    .index
                    .search(&embedding, k)
                    .into_iter()
                    .map(|s| RetrievedThought {
                        id: s.id,
                        score: s.score,
                    })
                    .collect())
            }
            RetrievalMode::ActivationWeighted => {
                let embedding = self.embedder.embed(query).await.map_err(SubstrateError::from)?;
                let candidates: Vec<(ThoughtId, f32)> = self
                    .index
                    .search(&embedding, k.max(self.config.semantic_top_m))
                    .into_iter()
                    .map(|s| (s.id, s.score))
                    .collect();
                let activations: HashMap<ThoughtId, f64> = self
                    .thoughts
                    .iter()
                    .map(|(id, t)| (id.clone(), t.activation))
                    .collect();
                let mut ranked = activation_weighted(candidates, &activations, self.config.activation_weight_alpha);
                ranked.truncate(k);
                Ok(ranked)
            }
            RetrievalMode::Spreading => {
                let Some(origin) = origin else {
                    return Err(SubstrateError::NotFound {
                        kind: "thought",
                        id: "(spreading retrieval requires an origin)".to_string(),
                    });
                };
                let mut ranked = spreading(
                    &self.graph,
                    origin,
                    self.config.spreading_max_depth,
                    self.config.spreading_damping,
                );
                ranked.truncate(k);
                Ok(ranked)
            }
        }
    }

    /// Boost a thought's activation and touch `last_accessed`, propagating
    /// half the boost to its directly connected thoughts (`spec.md` §4.B).
    #[tracing::instrument(skip(self), err)]
    pub fn reinforce(&mut self, id: &ThoughtId, now: DateTime<Utc>) -> Result<(), SubstrateError> {
        let boost = self.config.reinforcement_boost;
        {
            let thought = self.thoughts.get_mut(id).ok_or_else(|| SubstrateError::NotFound {
                kind: "thought",
                id: id.0.clone(),
            })?;
            thought.activation += boost;
            thought.clamp_activation();
            thought.last_accessed = now;
        }

        let neighbors = self.graph.outgoing(id);
        for (neighbor_id, _edge) in neighbors {
            if let Some(neighbor) = self.thoughts.get_mut(&neighbor_id) {
                neighbor.activation += boost / 2.0;
                neighbor.clamp_activation();
            }
        }
        Ok(())
    }

    /// Discard the vector index and re-embed every thought from scratch
    /// (`spec.md` §7 corrupt-state rebuild). Best-effort per thought, same as
    /// `save` — a thought whose re-embed fails is simply left without a
    /// vector rather than aborting the whole rebuild.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_index(&mut self) {
        self.index = FlatIndex::new(self.index.dimensions(), self.index.backend_name().to_string());
        let ids: Vec<ThoughtId> = self.order.clone();
        for id in ids {
            let Some(content) = self.thoughts.get(&id).map(|t| t.content.clone()) else {
                continue;
            };
            match self.embedder.embed(&content).await {
                Ok(embedding) => self.index.upsert(id, embedding),
                Err(err) => tracing::warn!(error = %err, thought = %id.0, "failed to re-embed thought during index rebuild"),
            }
        }
    }

    /// Discard the association graph and recompute it from the current
    /// thoughts and vector index (`spec.md` §7 corrupt-state rebuild). Unlike
    /// `save`'s incremental association-building, every thought is matched
    /// against the full final population, so resulting edge weights are the
    /// same kind but not necessarily identical to a from-scratch replay.
    #[tracing::instrument(skip(self))]
    pub fn recompute_associations(&mut self, now: DateTime<Utc>) {
        self.graph = ThoughtGraph::new();
        for id in &self.order {
            self.graph.ensure_node(id);
        }

        let ids: Vec<ThoughtId> = self.order.clone();
        for id in &ids {
            let Some(thought) = self.thoughts.get(id).cloned() else {
                continue;
            };
            let embedding = self.index.vector(id).map(|v| v.to_vec());

            let semantic = embedding.as_deref().map(|e| self.semantic_candidates(e, id)).unwrap_or_default();
            let temporal = self.temporal_candidates(id, now);
            let contextual = self.contextual_candidates(&thought, id);

            let mut weights: HashMap<ThoughtId, (f64, AssociationKind)> = HashMap::new();
            for (target, similarity) in semantic {
                weights.insert(target, (similarity as f64, AssociationKind::Semantic));
            }
            for (target, recency_weight) in temporal {
                weights
                    .entry(target)
                    .and_modify(|(w, _kind)| *w += self.config.temporal_mix * recency_weight)
                    .or_insert((self.config.temporal_mix * recency_weight, AssociationKind::Temporal));
            }
            for (target, overlap) in contextual {
                weights.entry(target).and_modify(|(w, _kind)| *w += overlap).or_insert((overlap, AssociationKind::Contextual));
            }

            for (target, (weight, kind)) in weights {
                let assoc = Association::new(target.clone(), weight, kind);
                self.graph.upsert_edge(id, &target, &assoc);
                let reverse = Association::new(id.clone(), weight, kind);
                self.graph.upsert_edge(&target, id, &reverse);
            }
        }
    }

    /// Apply half-life decay to every thought's activation and every
    /// association's weight, pruning associations that decay to near zero.
    #[tracing::instrument(skip(self))]
    pub fn decay(&mut self, now: DateTime<Utc>) {
        for thought in self.thoughts.values_mut() {
            thought.activation = decay_activation(
                thought.activation,
                thought.last_accessed,
                now,
                self.config.activation_half_life_days,
            );
        }

        let ids: Vec<ThoughtId> = self.order.clone();
        for id in &ids {
            // A day's worth of decay per tick keeps association weights
            // trending toward the same half-life as activation without
            // tracking a per-edge last-touched timestamp.
            self.graph.scale_edges_from(id, |w| decay_weight(w, 1.0, self.config.association_half_life_days));
        }
        self.graph.prune_weak_edges(f64::EPSILON.sqrt());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use substrate_core::errors::BackendError;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError> {
            let mut v = vec![0.0f32; 4];
            for (i, b) in text.bytes().enumerate() {
                v[i % 4] += b as f32;
            }
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > f32::EPSILON {
                for x in &mut v {
                    *x /= norm;
                }
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new(Arc::new(StubEmbedder), MemoryConfig::default())
    }

    #[tokio::test]
    async fn save_establishes_semantic_association_between_similar_thoughts() {
        let mut s = store();
        let now = Utc::now();
        let a = s
            .save("rust async runtime", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();
        let _b = s
            .save("rust async runtime tokio", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();

        let outgoing = s.graph.outgoing(&a);
        assert!(!outgoing.is_empty(), "expected at least one association from the first thought");
    }

    #[tokio::test]
    async fn reinforce_boosts_activation_and_decay_reduces_it_over_two_half_lives() {
        let mut s = store();
        let now = Utc::now();
        let a = s
            .save("dream about flying", ThoughtType::Dream, "test", Value::default(), now)
            .await
            .unwrap();

        s.reinforce(&a, now).unwrap();
        let boosted = s.get(&a).unwrap().activation;
        assert!(boosted > 0.99, "activation should clamp near 1.0 after reinforcement");

        let later = now + Duration::days(14);
        s.decay(later);
        let decayed = s.get(&a).unwrap().activation;
        assert!(
            (decayed - 0.25).abs() < 0.05,
            "two activation half-lives (14 days at a 7-day half-life) should leave ~0.25, got {decayed}"
        );
    }

    #[tokio::test]
    async fn reinforce_missing_thought_errors() {
        let mut s = store();
        let err = s.reinforce(&ThoughtId::from("absent"), Utc::now());
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn reinforce_propagates_half_boost_to_connected_thoughts() {
        let mut s = store();
        let now = Utc::now();
        let a = s
            .save("rust async runtime", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();
        let b = s
            .save("rust async runtime tokio", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();

        let before = s.get(&b).unwrap().activation;
        s.reinforce(&a, now).unwrap();
        let after = s.get(&b).unwrap().activation;
        assert!(after > before, "a connected thought should gain activation when its neighbor is reinforced");
    }

    #[tokio::test]
    async fn rebuild_index_restores_vectors_for_every_thought() {
        let mut s = store();
        let now = Utc::now();
        let a = s
            .save("rust async runtime", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();

        assert!(s.embedding_of(&a).is_some());
        s.index = FlatIndex::new(s.index.dimensions(), s.index.backend_name().to_string());
        assert!(s.embedding_of(&a).is_none());

        s.rebuild_index().await;
        assert!(s.embedding_of(&a).is_some());
    }

    #[tokio::test]
    async fn recompute_associations_reestablishes_semantic_edges() {
        let mut s = store();
        let now = Utc::now();
        let a = s
            .save("rust async runtime", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();
        let _b = s
            .save("rust async runtime tokio", ThoughtType::Reflection, "test", Value::default(), now)
            .await
            .unwrap();

        s.graph = ThoughtGraph::new();
        for id in &s.order.clone() {
            s.graph.ensure_node(id);
        }
        assert!(s.graph.outgoing(&a).is_empty());

        s.recompute_associations(now);
        assert!(!s.graph.outgoing(&a).is_empty());
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use substrate_core::errors::BackendError;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError> {
            let mut v = vec![0.0f32; 4];
            for (i, b) in text.bytes().enumerate() {
                v[i % 4] += b as f32;
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new(Arc::new(StubEmbedder), MemoryConfig::default())
    }

    proptest! {
        // Invariant 5 (`spec.md` §8): repeated reinforcement stabilizes at
        // the activation ceiling rather than overshooting or oscillating.
        #[test]
        fn reinforce_is_idempotent_up_to_ceiling(repeats in 1usize..50) {
            tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
                let mut s = store();
                let now = Utc::now();
                let id = s
                    .save("a thought", ThoughtType::Reflection, "test", Value::default(), now)
                    .await
                    .unwrap();
                for _ in 0..repeats {
                    s.reinforce(&id, now).unwrap();
                }
                let activation = s.get(&id).unwrap().activation;
                prop_assert!((activation - 1.0).abs() < 1e-9, "activation {activation} did not stabilize at ceiling");
            });
        }
    }
}
