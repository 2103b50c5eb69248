//! Concept evolution engine (`spec.md` §4.C): clusters active thoughts,
//! reconciles clusters against existing concepts, derives labels, advances
//! lifecycle stages, and recomputes the concept graph.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use substrate_core::config::ConceptConfig;
use substrate_core::types::{Concept, ConceptEdge, ConceptId, ConceptStage};
use substrate_core::ThoughtId;

use crate::clustering::{centroid, cluster_embeddings, cosine, weighted_centroid, ClusterResult};
use crate::lifecycle::{next_transition, Transition};
use crate::tfidf::derive_label;

pub struct ConceptStore {
    concepts: HashMap<ConceptId, Concept>,
}

impl Default for ConceptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptStore {
    pub fn new() -> Self {
        Self {
            concepts: HashMap::new(),
        }
    }

    pub fn restore(concepts: Vec<Concept>) -> Self {
        Self {
            concepts: concepts.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn snapshot(&self) -> Vec<Concept> {
        let mut out: Vec<Concept> = self.concepts.values().cloned().collect();
        out.sort_by(|a, b| a.first_seen.cmp(&b.first_seen));
        out
    }

    pub fn get(&self, id: &ConceptId) -> Option<&Concept> {
        self.concepts.get(id)
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Concepts a thought belongs to.
    pub fn for_thought(&self, thought: &ThoughtId) -> Vec<&Concept> {
        self.concepts.values().filter(|c| c.members.contains(thought)).collect()
    }

    /// Run one evolution cycle: cluster `candidates`, reconcile against
    /// existing concepts, advance lifecycle stages, recompute edges.
    pub fn evolve(
        &mut self,
        candidates: &[(ThoughtId, String, Vec<f32>, f64)],
        now: DateTime<Utc>,
        config: &ConceptConfig,
    ) -> EvolveReport {
        let mut report = EvolveReport::default();

        if candidates.len() < config.min_cluster_size {
            return report;
        }

        let embeddings: Vec<Vec<f32>> = candidates.iter().map(|(_, _, e, _)| e.clone()).collect();
        let ClusterResult { clusters, noise } = cluster_embeddings(&embeddings, config.min_cluster_size);
        report.noise_count = noise.len();

        for cluster in &clusters {
            let cluster_centroid = centroid(&embeddings, cluster);
            let member_ids: BTreeSet<ThoughtId> = cluster.iter().map(|&i| candidates[i].0.clone()).collect();
            let contents: Vec<String> = cluster.iter().map(|&i| candidates[i].1.clone()).collect();
            let salience: f64 = cluster.iter().map(|&i| candidates[i].3).sum();

            let best_match = self
                .concepts
                .values()
                .map(|c| (c.id.clone(), cosine(&c.centroid, &cluster_centroid)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            match best_match {
                Some((id, similarity)) if similarity >= config.merge_threshold => {
                    let concept = self.concepts.get_mut(&id).unwrap();
                    let existing_weight = concept.members.len() as f64;
                    let incoming_weight = member_ids.len() as f64;
                    concept.centroid = weighted_centroid(&concept.centroid, existing_weight, &cluster_centroid, incoming_weight);
                    concept.members.extend(member_ids);
                    concept.salience += salience;
                    concept.last_updated = now;
                    report.merged.push(id);
                }
                Some((id, similarity)) if similarity >= config.reconcile_threshold => {
                    let concept = self.concepts.get_mut(&id).unwrap();
                    let existing_weight = concept.members.len() as f64;
                    let incoming_weight = member_ids.len() as f64;
                    concept.centroid = weighted_centroid(&concept.centroid, existing_weight, &cluster_centroid, incoming_weight);
                    concept.members.extend(member_ids);
                    concept.salience += salience;
                    concept.last_updated = now;
                    report.reconciled.push(id);
                }
                _ => {
                    let label = derive_label(&contents);
                    let concept = Concept {
                        id: ConceptId::new(),
                        label,
                        stage: ConceptStage::Emerging,
                        centroid: cluster_centroid,
                        members: member_ids,
                        first_seen: now,
                        last_updated: now,
                        edges: Vec::new(),
                        salience,
                        below_min_cycles: 0,
                        cycles_alive: 0,
                    };
                    report.created.push(concept.id.clone());
                    self.concepts.insert(concept.id.clone(), concept);
                }
            }
        }

        self.advance_lifecycles(config, &mut report);
        self.recompute_edges(config);
        report
    }

    /// Salience value at (or above) the population's 90th percentile, used
    /// to decide `established -> central` promotion (`spec.md` §4.C: "top
    /// 10% of concepts"). A population of one concept is trivially its own
    /// top decile.
    fn top_decile_salience_threshold(&self) -> f64 {
        let mut saliences: Vec<f64> = self.concepts.values().map(|c| c.salience).collect();
        if saliences.is_empty() {
            return f64::INFINITY;
        }
        saliences.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = (((saliences.len() as f64) * 0.9).floor() as usize).min(saliences.len() - 1);
        saliences[idx]
    }

    fn advance_lifecycles(&mut self, config: &ConceptConfig, report: &mut EvolveReport) {
        let central_threshold = self.top_decile_salience_threshold();
        let mut to_delete = Vec::new();
        for concept in self.concepts.values_mut() {
            concept.cycles_alive += 1;
            if concept.members.len() < config.min_cluster_size {
                concept.below_min_cycles += 1;
            } else {
                concept.below_min_cycles = 0;
            }

            let transition = next_transition(
                concept.stage,
                concept.members.len(),
                concept.cycles_alive,
                concept.below_min_cycles,
                concept.salience >= central_threshold,
                config,
            );

            match transition {
                Transition::None => {}
                Transition::Promote(stage) => {
                    concept.stage = stage;
                    report.promoted.push((concept.id.clone(), stage));
                }
                Transition::Fade => {
                    concept.stage = ConceptStage::Fading;
                    report.faded.push(concept.id.clone());
                }
                Transition::Delete => to_delete.push(concept.id.clone()),
            }
        }
        for id in to_delete {
            self.concepts.remove(&id);
            report.deleted.push(id);
        }
    }

    /// Recompute concept-to-concept edges: `0.5 * Jaccard(members) + 0.5 *
    /// cosine(centroids)`, keeping edges above `config.new_threshold`.
    fn recompute_edges(&mut self, config: &ConceptConfig) {
        let ids: Vec<ConceptId> = self.concepts.keys().cloned().collect();
        let mut new_edges: HashMap<ConceptId, Vec<ConceptEdge>> = HashMap::new();

        for i in 0..ids.len() {
            for j in 0..ids.len() {
                if i == j {
                    continue;
                }
                let a = &self.concepts[&ids[i]];
                let b = &self.concepts[&ids[j]];
                let intersection = a.members.intersection(&b.members).count();
                let union = a.members.union(&b.members).count().max(1);
                let jaccard = intersection as f64 / union as f64;
                let centroid_sim = cosine(&a.centroid, &b.centroid);
                let weight = 0.5 * jaccard + 0.5 * centroid_sim;
                if weight >= config.new_threshold {
                    new_edges.entry(ids[i].clone()).or_default().push(ConceptEdge {
                        target: ids[j].clone(),
                        weight,
                    });
                }
            }
        }

        for id in ids {
            if let Some(concept) = self.concepts.get_mut(&id) {
                concept.edges = new_edges.remove(&id).unwrap_or_default();
            }
        }
    }

    /// Attach `thought` to up to `max_concepts_per_thought` concepts whose
    /// centroid is closest to `embedding` (`spec.md` §4.C).
    pub fn integrate(&mut self, thought: ThoughtId, embedding: &[f32], config: &ConceptConfig) -> Vec<ConceptId> {
        let mut scored: Vec<(ConceptId, f64)> = self
            .concepts
            .values()
            .map(|c| (c.id.clone(), cosine(&c.centroid, embedding)))
            .filter(|(_, score)| *score >= config.new_threshold)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(config.max_concepts_per_thought);

        for (id, _) in &scored {
            if let Some(concept) = self.concepts.get_mut(id) {
                concept.members.insert(thought.clone());
            }
        }
        scored.into_iter().map(|(id, _)| id).collect()
    }
}

#[derive(Debug, Default)]
pub struct EvolveReport {
    pub created: Vec<ConceptId>,
    pub merged: Vec<ConceptId>,
    pub reconciled: Vec<ConceptId>,
    pub promoted: Vec<(ConceptId, ConceptStage)>,
    pub faded: Vec<ConceptId>,
    pub deleted: Vec<ConceptId>,
    pub noise_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thought(n: &str) -> ThoughtId {
        ThoughtId::from(n)
    }

    #[test]
    fn evolve_below_min_cluster_size_is_a_no_op() {
        let mut store = ConceptStore::new();
        let config = ConceptConfig::default();
        let candidates = vec![(thought("a"), "hi".to_string(), vec![1.0, 0.0], 0.5)];
        let report = store.evolve(&candidates, Utc::now(), &config);
        assert!(store.is_empty());
        assert_eq!(report.created.len(), 0);
    }

    fn concept_with_salience(label: &str, salience: f64, now: DateTime<Utc>) -> Concept {
        Concept {
            id: ConceptId::new(),
            label: label.to_string(),
            stage: ConceptStage::Established,
            centroid: vec![1.0, 0.0],
            members: BTreeSet::from([thought(label)]),
            first_seen: now,
            last_updated: now,
            edges: Vec::new(),
            salience,
            below_min_cycles: 0,
            cycles_alive: 3,
        }
    }

    #[test]
    fn top_decile_salience_threshold_isolates_the_highest_scoring_concepts() {
        let now = Utc::now();
        let mut store = ConceptStore::new();
        for (label, salience) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 10.0)] {
            let c = concept_with_salience(label, salience, now);
            store.concepts.insert(c.id.clone(), c);
        }

        let threshold = store.top_decile_salience_threshold();
        assert!((threshold - 10.0).abs() < 1e-9, "with 5 concepts the top decile is the single highest-salience one");
    }

    #[test]
    fn merge_computes_weighted_mean_centroid_instead_of_overwriting() {
        let now = Utc::now();
        let mut store = ConceptStore::new();
        let mut existing = concept_with_salience("existing", 1.0, now);
        existing.centroid = vec![0.0, 1.0];
        existing.members = BTreeSet::from([thought("m0"), thought("m1"), thought("m2"), thought("m3")]);
        let existing_id = existing.id.clone();
        store.concepts.insert(existing_id.clone(), existing);

        let config = ConceptConfig {
            min_cluster_size: 3,
            merge_threshold: -1.0,
            ..ConceptConfig::default()
        };
        // A tight new cluster pointing away from the existing centroid, so
        // an overwrite and a weighted mean would disagree on the result.
        let candidates: Vec<_> = (0..3)
            .map(|i| (thought(&format!("new{i}")), "incoming".to_string(), vec![1.0, 0.01 * i as f32], 0.5))
            .collect();
        let report = store.evolve(&candidates, now, &config);

        assert_eq!(report.merged, vec![existing_id.clone()]);
        let merged = store.get(&existing_id).unwrap();
        assert!(
            merged.centroid[1] > merged.centroid[0],
            "four old members should outweigh three new ones in the merged centroid, got {:?}",
            merged.centroid
        );
    }

    #[test]
    fn evolve_creates_a_concept_from_a_tight_cluster() {
        let mut store = ConceptStore::new();
        let config = ConceptConfig {
            min_cluster_size: 3,
            ..ConceptConfig::default()
        };
        let candidates: Vec<_> = (0..4)
            .map(|i| {
                (
                    thought(&format!("t{i}")),
                    "recurring dream about flying".to_string(),
                    vec![1.0, 0.01 * i as f32],
                    0.8,
                )
            })
            .collect();
        let report = store.evolve(&candidates, Utc::now(), &config);
        assert_eq!(report.created.len(), 1);
        assert_eq!(store.len(), 1);
    }
}
