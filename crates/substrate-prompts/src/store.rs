//! The dynamic prompt store (`spec.md` §4.D): weighted selection, EWMA
//! feedback, mutation-based evolution, and retirement of low performers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use substrate_core::config::PromptConfig;
use substrate_core::errors::{PatternError, SubstrateError};
use substrate_core::{PatternId, PromptPattern};

use crate::extraction::abstract_template;
use crate::feedback::ewma_update;
use crate::template::render;

pub struct PromptStore {
    patterns: HashMap<PatternId, PromptPattern>,
    /// Consecutive selections a pattern has scored below its thought type's
    /// evolve threshold. Reset on any selection scoring at or above it.
    low_score_streak: HashMap<PatternId, u64>,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptStore {
    pub fn new() -> Self {
        Self {
            patterns: HashMap::new(),
            low_score_streak: HashMap::new(),
        }
    }

    pub fn restore(patterns: Vec<PromptPattern>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| (p.id.clone(), p)).collect(),
            low_score_streak: HashMap::new(),
        }
    }

    pub fn snapshot(&self) -> Vec<PromptPattern> {
        let mut out: Vec<PromptPattern> = self.patterns.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        out
    }

    pub fn register_seed(&mut self, pattern: PromptPattern) {
        self.patterns.insert(pattern.id.clone(), pattern);
    }

    pub fn get(&self, id: &PatternId) -> Option<&PromptPattern> {
        self.patterns.get(id)
    }

    /// Weighted-random selection among patterns registered for
    /// `thought_type`, rendered against `variables` (`spec.md` §4.D).
    /// Patterns with few `usage_count` get a starvation prior added to their
    /// score so new/derived patterns are sampled often enough to accumulate
    /// feedback. A placeholder left unresolved by `variables` raises a
    /// pattern/context mismatch rather than silently returning a prompt with
    /// a literal `{{name}}` in it.
    #[tracing::instrument(skip(self, rng), err)]
    pub fn select(
        &self,
        thought_type: &str,
        variables: &HashMap<String, String>,
        rng: &mut impl Rng,
    ) -> Result<(PatternId, String), SubstrateError> {
        let candidates: Vec<&PromptPattern> = self
            .patterns
            .values()
            .filter(|p| p.thought_type == thought_type)
            .collect();
        if candidates.is_empty() {
            return Err(SubstrateError::PatternMismatch(PatternError::NoPatternForType {
                thought_type: thought_type.to_string(),
            }));
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|p| {
                let starvation_prior = 1.0 / (1.0 + p.usage_count as f64);
                p.success_score + starvation_prior
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let mut roll = rng.gen_range(0.0..total);
        let mut chosen = *candidates.last().unwrap();
        for (candidate, weight) in candidates.iter().zip(weights.iter()) {
            if roll < *weight {
                chosen = *candidate;
                break;
            }
            roll -= weight;
        }

        let rendered = render(&chosen.template, variables)?;
        Ok((chosen.id.clone(), rendered))
    }

    /// If `producer`'s success signal is high and `thought_content` is
    /// stable under placeholder abstraction against `context`, record a new
    /// pattern descended from `producer` (`spec.md` §4.D). Returns `None`
    /// when the producer is unknown, its score is below
    /// `config.evolve_threshold`, or no context variable occurs in the
    /// thought's content.
    pub fn extract(
        &mut self,
        producer: &PatternId,
        thought_content: &str,
        thought_type: &str,
        context: &HashMap<String, String>,
        config: &PromptConfig,
        now: DateTime<Utc>,
    ) -> Option<PatternId> {
        let producer_pattern = self.patterns.get(producer)?;
        if producer_pattern.success_score < config.evolve_threshold {
            return None;
        }
        let template = abstract_template(thought_content, context)?;

        let child = PromptPattern {
            id: PatternId::new(),
            thought_type: thought_type.to_string(),
            template,
            parent_id: Some(producer.clone()),
            usage_count: 0,
            success_score: producer_pattern.success_score * config.inheritance_factor,
            created_at: now,
            is_seed: false,
        };
        let id = child.id.clone();
        self.patterns.insert(id.clone(), child);
        Some(id)
    }

    /// Record a selection and fold `signal` into the pattern's EWMA score
    /// (`spec.md` §4.D). Returns whether the pattern should be retired.
    pub fn feedback(&mut self, id: &PatternId, signal: f64, config: &PromptConfig) -> Result<bool, SubstrateError> {
        let pattern = self.patterns.get_mut(id).ok_or_else(|| SubstrateError::NotFound {
            kind: "pattern",
            id: id.0.clone(),
        })?;
        pattern.usage_count += 1;
        pattern.success_score = ewma_update(pattern.success_score, signal, config.ewma_beta);

        let streak = self.low_score_streak.entry(id.clone()).or_insert(0);
        if pattern.success_score < config.evolve_threshold {
            *streak += 1;
        } else {
            *streak = 0;
        }

        let should_retire = !pattern.is_seed && *streak >= config.retirement_selections;
        if should_retire {
            self.patterns.remove(id);
            self.low_score_streak.remove(id);
        }
        Ok(should_retire)
    }

    /// Spawn mutated children from every pattern scoring at or above
    /// `config.evolve_threshold`, inheriting `parent_score *
    /// inheritance_factor` (`spec.md` §4.D).
    pub fn evolve(&mut self, config: &PromptConfig, now: DateTime<Utc>, mutate: impl Fn(&str) -> String) -> Vec<PatternId> {
        let parents: Vec<PromptPattern> = self
            .patterns
            .values()
            .filter(|p| p.success_score >= config.evolve_threshold)
            .cloned()
            .collect();

        let mut spawned = Vec::new();
        for parent in parents {
            let child = PromptPattern {
                id: PatternId::new(),
                thought_type: parent.thought_type.clone(),
                template: mutate(&parent.template),
                parent_id: Some(parent.id.clone()),
                usage_count: 0,
                success_score: parent.success_score * config.inheritance_factor,
                created_at: now,
                is_seed: false,
            };
            spawned.push(child.id.clone());
            self.patterns.insert(child.id.clone(), child);
        }
        spawned
    }
}
