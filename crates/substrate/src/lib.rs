//! The cognitive substrate: a persistent, self-evolving memory and
//! reasoning layer wiring together emergent memory, concept evolution, the
//! dynamic prompt store, and the adaptive scheduler behind one in-process
//! API (`spec.md` §6). Mirrors the role a top-level `cortex` facade crate
//! would play composing the `cortex-*` subsystem crates.

pub mod embedder;
pub mod logging;
pub mod seeds;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use substrate_concepts::{ConceptStore, EvolveReport};
use substrate_core::config::SubstrateConfig;
use substrate_core::errors::SubstrateError;
use substrate_core::types::{Concept, ConceptEdge, ConceptId, JobState, Mood, PatternId, PromptPattern, ThoughtId, ThoughtType, Value};
use substrate_embeddings::FlatIndex;
use substrate_memory::{AssociationEdgeRecord, MemoryStore, RetrievalMode, RetrievedThought};
use substrate_prompts::PromptStore;
use substrate_scheduler::Scheduler;
use substrate_store::{read_blob, read_json, write_blob, write_json, DataDirLayout, DirectoryLock};
use tokio::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;

struct Inner {
    memory: MemoryStore,
    concepts: ConceptStore,
    prompts: PromptStore,
}

/// The background jobs the scheduler runs by default, and the base
/// interval (seconds) each starts at before adaptation.
const DEFAULT_JOBS: &[(&str, f64)] = &[
    ("pulse", 60.0),
    ("monologue", 900.0),
    ("reflection", 1800.0),
    ("dream", 3600.0),
    ("existential", 7200.0),
];

/// Minimum activation a thought needs to be considered for concept
/// clustering (`spec.md` §4.C).
const CONCEPT_CANDIDATE_MIN_ACTIVATION: f64 = 0.2;

pub struct Substrate {
    config: SubstrateConfig,
    layout: DataDirLayout,
    _lock: DirectoryLock,
    _log_guard: Option<WorkerGuard>,
    inner: Mutex<Inner>,
    scheduler: Arc<Scheduler>,
}

impl Substrate {
    /// Open (or create) the substrate rooted at `config.data_dir`, acquiring
    /// the directory's exclusive lock (`spec.md` §5, §7 directory-locked).
    /// A corrupt `vector_index.bin` or `thought_associations.json` is
    /// recovered automatically by rebuilding from `thoughts.json`, which
    /// remains the sole source of truth (`spec.md` §7); a corrupt
    /// `thoughts.json` itself has nothing to rebuild from and surfaces as
    /// `SubstrateError::CorruptState`.
    pub async fn open(config: SubstrateConfig) -> Result<Self, SubstrateError> {
        let layout = DataDirLayout::new(config.data_dir.clone());
        let lock = DirectoryLock::acquire(layout.root())?;
        let log_guard = logging::init(&layout.logs_dir()).ok();

        let embedder = embedder::build_embedder(&config.embedding_backend)?;

        let thoughts: Vec<substrate_core::Thought> = read_json(&layout.thoughts()).await?.unwrap_or_default();
        let thoughts_is_empty = thoughts.is_empty();

        let mut associations_corrupt = false;
        let edges: Vec<AssociationEdgeRecord> = match read_json(&layout.associations()).await {
            Ok(edges) => edges.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "associations file corrupt; recomputing from thoughts");
                associations_corrupt = true;
                Vec::new()
            }
        };

        let mut index_rebuild_needed = false;
        let index = match read_blob::<FlatIndex>(&layout.vector_index()).await {
            Ok(Some(index)) if index.dimensions() == embedder.dimensions() && index.backend_name() == embedder.name() => index,
            Ok(Some(_)) => {
                tracing::warn!("stored vector index backend/dimension mismatch; rebuilding from thoughts");
                index_rebuild_needed = true;
                FlatIndex::new(embedder.dimensions(), embedder.name())
            }
            Ok(None) => FlatIndex::new(embedder.dimensions(), embedder.name()),
            Err(err) => {
                tracing::warn!(error = %err, "vector index file corrupt; rebuilding from thoughts");
                index_rebuild_needed = true;
                FlatIndex::new(embedder.dimensions(), embedder.name())
            }
        };

        let mut memory = MemoryStore::restore(embedder, config.memory.clone(), thoughts, edges, index);
        let now = Utc::now();
        if index_rebuild_needed && !thoughts_is_empty {
            memory.rebuild_index().await;
        }
        if (index_rebuild_needed || associations_corrupt) && !thoughts_is_empty {
            memory.recompute_associations(now);
        }

        let concepts: Vec<Concept> = read_json(&layout.concepts()).await?.unwrap_or_default();
        let concepts = ConceptStore::restore(concepts);

        let mut patterns: Vec<PromptPattern> = read_json(&layout.prompt_patterns()).await?.unwrap_or_default();
        if patterns.is_empty() {
            patterns = seeds::seed_patterns(Utc::now());
        }
        let mut prompts = PromptStore::new();
        for pattern in patterns {
            prompts.register_seed(pattern);
        }

        let scheduler_jobs: Vec<JobState> = read_json(&layout.scheduler_state()).await?.unwrap_or_default();
        let mood: Mood = read_json(&layout.root().join("scheduler_mood.json"))
            .await?
            .unwrap_or_default();
        let scheduler = Scheduler::restore(scheduler_jobs, mood, config.scheduler.clone());
        for (name, base_interval) in DEFAULT_JOBS {
            scheduler.register(*name, *base_interval, now);
        }

        Ok(Self {
            config,
            layout,
            _lock: lock,
            _log_guard: log_guard,
            inner: Mutex::new(Inner { memory, concepts, prompts }),
            scheduler: Arc::new(scheduler),
        })
    }

    /// Persist every subsystem's state atomically (`spec.md` §6).
    pub async fn checkpoint(&self) -> Result<(), SubstrateError> {
        let inner = self.inner.lock().await;
        write_json(&self.layout.thoughts(), &inner.memory.snapshot_thoughts()).await?;
        write_json(&self.layout.associations(), &inner.memory.snapshot_edges()).await?;
        write_blob(&self.layout.vector_index(), inner.memory.index()).await?;
        write_json(&self.layout.concepts(), &inner.concepts.snapshot()).await?;
        write_json(&self.layout.prompt_patterns(), &inner.prompts.snapshot()).await?;
        drop(inner);

        let (jobs, mood) = self.scheduler.snapshot();
        write_json(&self.layout.scheduler_state(), &jobs).await?;
        write_json(&self.layout.root().join("scheduler_mood.json"), &mood).await?;
        Ok(())
    }

    // ---- Emergent memory (`spec.md` §4.B) ----

    pub async fn save(
        &self,
        content: impl Into<String>,
        thought_type: ThoughtType,
        origin: impl Into<String>,
        metadata: Value,
    ) -> Result<ThoughtId, SubstrateError> {
        let mut inner = self.inner.lock().await;
        inner.memory.save(content, thought_type, origin, metadata, Utc::now()).await
    }

    pub async fn retrieve(
        &self,
        mode: RetrievalMode,
        query: &str,
        origin: Option<&ThoughtId>,
        k: usize,
    ) -> Result<Vec<RetrievedThought>, SubstrateError> {
        let inner = self.inner.lock().await;
        inner.memory.retrieve(mode, query, origin, k).await
    }

    pub async fn reinforce(&self, id: &ThoughtId) -> Result<(), SubstrateError> {
        let mut inner = self.inner.lock().await;
        inner.memory.reinforce(id, Utc::now())
    }

    pub async fn recent(&self, limit: usize) -> Vec<substrate_core::Thought> {
        let inner = self.inner.lock().await;
        inner.memory.recent(limit).into_iter().cloned().collect()
    }

    pub async fn get(&self, id: &ThoughtId) -> Option<substrate_core::Thought> {
        let inner = self.inner.lock().await;
        inner.memory.get(id).cloned()
    }

    /// Run decay immediately, outside the scheduler's own cadence (the
    /// scheduler otherwise ties decay to the `pulse` job — see
    /// `SPEC_FULL.md` §9).
    pub async fn decay_now(&self) {
        let mut inner = self.inner.lock().await;
        inner.memory.decay(Utc::now());
    }

    // ---- Concept evolution (`spec.md` §4.C) ----

    pub async fn integrate(&self, thought: ThoughtId) -> Vec<ConceptId> {
        let mut inner = self.inner.lock().await;
        let Some(embedding) = inner.memory.embedding_of(&thought).map(|e| e.to_vec()) else {
            return Vec::new();
        };
        inner.concepts.integrate(thought, &embedding, &self.config.concepts)
    }

    pub async fn list_concepts(&self) -> Vec<Concept> {
        let inner = self.inner.lock().await;
        inner.concepts.snapshot()
    }

    pub async fn concept_neighbors(&self, id: &ConceptId) -> Vec<ConceptEdge> {
        let inner = self.inner.lock().await;
        inner.concepts.get(id).map(|c| c.edges.clone()).unwrap_or_default()
    }

    pub async fn force_evolve(&self) -> EvolveReport {
        let mut inner = self.inner.lock().await;
        let candidates: Vec<(ThoughtId, String, Vec<f32>, f64)> = inner
            .memory
            .active_thoughts(CONCEPT_CANDIDATE_MIN_ACTIVATION)
            .into_iter()
            .filter_map(|t| {
                let embedding = inner.memory.embedding_of(&t.id)?.to_vec();
                Some((t.id.clone(), t.content.clone(), embedding, t.activation))
            })
            .collect();
        inner.concepts.evolve(&candidates, Utc::now(), &self.config.concepts)
    }

    // ---- Dynamic prompt store (`spec.md` §4.D) ----

    /// Weighted-select a pattern for `thought_type` and render it against
    /// `variables`, returning the pattern's id (for later `pattern_feedback`
    /// or `extract`) alongside the rendered text.
    #[tracing::instrument(skip(self, variables), err)]
    pub async fn select_pattern(
        &self,
        thought_type: &str,
        variables: &HashMap<String, String>,
    ) -> Result<(PatternId, String), SubstrateError> {
        let inner = self.inner.lock().await;
        let mut rng = rand::thread_rng();
        inner.prompts.select(thought_type, variables, &mut rng)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn pattern_feedback(&self, id: &PatternId, signal: f64) -> Result<bool, SubstrateError> {
        let mut inner = self.inner.lock().await;
        inner.prompts.feedback(id, signal, &self.config.prompts)
    }

    /// Record a new pattern descended from `producer` if its content abstracts
    /// cleanly against `context` (`spec.md` §4.D).
    pub async fn extract_pattern(
        &self,
        producer: &PatternId,
        thought_content: &str,
        thought_type: &str,
        context: &HashMap<String, String>,
    ) -> Option<PatternId> {
        let mut inner = self.inner.lock().await;
        inner
            .prompts
            .extract(producer, thought_content, thought_type, context, &self.config.prompts, Utc::now())
    }

    pub async fn evolve_prompts_now(&self) -> Vec<PatternId> {
        let mut inner = self.inner.lock().await;
        inner.prompts.evolve(&self.config.prompts, Utc::now(), |template| format!("{template} Consider a different angle."))
    }

    // ---- Adaptive scheduler (`spec.md` §4.E) ----

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn trigger(&self, job: &str) -> Result<(), SubstrateError> {
        self.scheduler.trigger(job)
    }

    pub fn set_mood(&self, dim: impl Into<String>, value: f64) {
        self.scheduler.set_mood(dim, value);
    }

    /// Due jobs as of `now`, for callers driving their own execution loop
    /// (the facade does not spawn one itself so tests stay deterministic).
    pub fn due_jobs(&self, now: DateTime<Utc>) -> Vec<String> {
        self.scheduler.due_jobs(now)
    }

    /// Mark `name` `Running` so a concurrent `due_jobs` call won't report it
    /// (or any other job) due again until `mark_job_run` clears it
    /// (`spec.md` §4.E single-flight jobs).
    pub fn begin_job_run(&self, name: &str) -> Result<(), SubstrateError> {
        self.scheduler.begin_run(name)
    }

    pub fn mark_job_run(&self, name: &str, now: DateTime<Utc>, signal: f64) -> Result<(), SubstrateError> {
        self.scheduler.mark_run(name, now, signal)
    }
}
