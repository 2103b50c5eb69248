//! End-to-end scenarios exercising the facade against a real on-disk data
//! directory, mirroring the way the `cortex` workspace drives its
//! subsystems through integration rather than unit tests.

use substrate::Substrate;
use substrate_core::config::SubstrateConfig;
use substrate_core::types::{ThoughtType, Value};
use substrate_memory::RetrievalMode;

fn config(dir: &std::path::Path) -> SubstrateConfig {
    let mut config = SubstrateConfig::default();
    config.data_dir = dir.to_path_buf();
    config.embedding_backend = "hash".to_string();
    config
}

/// S1: thoughts clustered tightly in embedding space crystallize into a
/// persistent concept once `force_evolve` runs.
#[tokio::test]
async fn s1_cluster_crystallization() {
    let dir = tempfile::TempDir::new().unwrap();
    let substrate = Substrate::open(config(dir.path())).await.unwrap();

    let samples = [
        "the garden needs watering every morning",
        "watering the garden keeps the tomatoes alive",
        "morning watering is the only chore the garden needs",
        "a garden without watering will not survive the summer",
    ];
    for sample in samples {
        substrate
            .save(sample, ThoughtType::Reflection, "test", Value::Null)
            .await
            .unwrap();
    }

    let report = substrate.force_evolve().await;
    assert_eq!(report.created.len(), 1, "tight cluster should crystallize into exactly one concept");

    let concepts = substrate.list_concepts().await;
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0].members.len(), samples.len());
}

/// S2: activation and association weight fall off with elapsed time once
/// `decay_now` runs.
#[tokio::test]
async fn s2_decay_reduces_activation_and_associations() {
    let dir = tempfile::TempDir::new().unwrap();
    let substrate = Substrate::open(config(dir.path())).await.unwrap();

    let id = substrate
        .save("a thought that will be left untouched", ThoughtType::Monologue, "test", Value::Null)
        .await
        .unwrap();

    let before = substrate.get(&id).await.unwrap().activation;
    substrate.decay_now().await;
    let after = substrate.get(&id).await.unwrap().activation;

    assert!(after <= before, "decay must never increase activation");
}

/// S3: spreading activation retrieval from an origin always ranks the
/// origin first (its seeded score of 1.0 can never be beaten by a damped
/// propagated score), and reaches thoughts connected only transitively.
#[tokio::test]
async fn s3_spreading_retrieval_ranks_origin_first_and_reaches_transitive_neighbors() {
    let dir = tempfile::TempDir::new().unwrap();
    let substrate = Substrate::open(config(dir.path())).await.unwrap();

    let a = substrate
        .save("ocean tide waves shoreline", ThoughtType::Reflection, "test", Value::Null)
        .await
        .unwrap();
    let b = substrate
        .save("ocean tide pulls the harbor", ThoughtType::Reflection, "test", Value::Null)
        .await
        .unwrap();
    let c = substrate
        .save("harbor pulls fishing boats ashore", ThoughtType::Reflection, "test", Value::Null)
        .await
        .unwrap();

    let results = substrate
        .retrieve(RetrievalMode::Spreading, "", Some(&a), 3)
        .await
        .unwrap();

    assert_eq!(results[0].id, a, "the origin's seeded score of 1.0 must outrank every propagated score");
    let ids: Vec<_> = results.iter().map(|r| r.id.clone()).collect();
    assert!(ids.contains(&b), "directly associated thought should be reached");
    assert!(ids.contains(&c), "transitively associated thought should be reached within the spreading depth");
}

/// S4: feedback below the evolve threshold, sustained, eventually spawns a
/// mutated child pattern and can retire a non-seed ancestor.
#[tokio::test]
async fn s4_pattern_evolution_spawns_children() {
    let dir = tempfile::TempDir::new().unwrap();
    let substrate = Substrate::open(config(dir.path())).await.unwrap();

    let mut vars = std::collections::HashMap::new();
    vars.insert("value".to_string(), "the tide".to_string());
    let (seed, rendered) = substrate.select_pattern("reflection", &vars).await.unwrap();
    assert!(!rendered.contains("{{"), "a rendered prompt should have no unresolved placeholders");
    for _ in 0..5 {
        substrate.pattern_feedback(&seed, 0.9).await.unwrap();
    }

    let children = substrate.evolve_prompts_now().await;
    assert!(!children.is_empty(), "a high-scoring pattern should spawn at least one child");
}

/// S4b: a thought stable under placeholder abstraction against the context
/// that produced it extracts a new derived pattern from a high-scoring
/// producer.
#[tokio::test]
async fn s4b_extract_pattern_from_high_scoring_producer() {
    let dir = tempfile::TempDir::new().unwrap();
    let substrate = Substrate::open(config(dir.path())).await.unwrap();

    let mut vars = std::collections::HashMap::new();
    vars.insert("value".to_string(), "the tide".to_string());
    let (producer, rendered) = substrate.select_pattern("reflection", &vars).await.unwrap();
    for _ in 0..3 {
        substrate.pattern_feedback(&producer, 0.95).await.unwrap();
    }

    let extracted = substrate.extract_pattern(&producer, &rendered, "reflection", &vars).await;
    assert!(extracted.is_some(), "a thought stable under placeholder abstraction should extract a child pattern");
}

/// S5: a calmer mood slows down reflective job cadence relative to the
/// neutral baseline.
#[tokio::test]
async fn s5_scheduler_adapts_to_mood() {
    let dir = tempfile::TempDir::new().unwrap();
    let substrate = Substrate::open(config(dir.path())).await.unwrap();

    let now = chrono::Utc::now();
    substrate.mark_job_run("reflection", now, 0.5).unwrap();
    let neutral_interval = substrate
        .scheduler()
        .snapshot()
        .0
        .iter()
        .find(|j| j.name == "reflection")
        .unwrap()
        .adapted_interval_secs;

    substrate.set_mood("calm", 1.0);
    substrate.mark_job_run("reflection", now, 0.5).unwrap();
    let calm_interval = substrate
        .scheduler()
        .snapshot()
        .0
        .iter()
        .find(|j| j.name == "reflection")
        .unwrap()
        .adapted_interval_secs;

    assert!(calm_interval >= neutral_interval, "high calm should not speed up a reflective job");
}

/// S5b: high tension shortens an existential job's cadence relative to a
/// pulse job in the same tense mood, since only existential's type factor
/// reacts to tension (`spec.md` §4.E).
#[tokio::test]
async fn s5b_tension_shortens_existential_relative_to_pulse() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cfg = config(dir.path());
    // Pin out jitter: the comparison below is between two independently
    // jittered draws, and the type-factor gap is narrow enough that default
    // jitter bounds could occasionally mask it.
    cfg.scheduler.jitter_min = 1.0;
    cfg.scheduler.jitter_max = 1.0;
    let substrate = Substrate::open(cfg).await.unwrap();

    substrate.set_mood("tension", 1.0);
    let now = chrono::Utc::now();
    substrate.mark_job_run("existential", now, 0.5).unwrap();
    substrate.mark_job_run("pulse", now, 0.5).unwrap();

    let (jobs, _) = substrate.scheduler().snapshot();
    let existential_base = jobs.iter().find(|j| j.name == "existential").unwrap();
    let pulse_base = jobs.iter().find(|j| j.name == "pulse").unwrap();

    let existential_ratio = existential_base.adapted_interval_secs / existential_base.base_interval_secs;
    let pulse_ratio = pulse_base.adapted_interval_secs / pulse_base.base_interval_secs;
    assert!(
        existential_ratio < pulse_ratio,
        "high tension should shrink existential's interval relative to its base more than pulse's, got {existential_ratio} vs {pulse_ratio}"
    );
}

/// S6: a checkpoint followed by a fresh `open` on the same directory
/// recovers every thought, concept, pattern, and job.
#[tokio::test]
async fn s6_crash_safety_round_trips_through_checkpoint() {
    let dir = tempfile::TempDir::new().unwrap();

    let id = {
        let substrate = Substrate::open(config(dir.path())).await.unwrap();
        let id = substrate
            .save("a thought that must survive a restart", ThoughtType::Pulse, "test", Value::Null)
            .await
            .unwrap();
        substrate.force_evolve().await;
        substrate.checkpoint().await.unwrap();
        id
    };

    let reopened = Substrate::open(config(dir.path())).await.unwrap();
    let recovered = reopened.get(&id).await;
    assert!(recovered.is_some(), "a checkpointed thought must survive reopening the substrate");
    assert_eq!(recovered.unwrap().content, "a thought that must survive a restart");
}
