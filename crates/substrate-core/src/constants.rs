//! Tunable defaults for the substrate, collected in one place the way
//! `cortex-core::constants` holds cross-crate limits.

/// Similarity threshold above which two thoughts are considered semantically
/// associated (`spec.md` §4.B).
pub const SEMANTIC_SIMILARITY_THRESHOLD: f32 = 0.55;

/// Top-M most-similar neighbors considered when establishing semantic
/// associations for a new thought.
pub const SEMANTIC_TOP_M: usize = 8;

/// Count of most-recent thoughts considered when establishing temporal
/// associations for a new thought.
pub const TEMPORAL_TOP_T: usize = 3;

/// Default weight given to temporal proximity when mixed with semantic
/// similarity while scoring associations (Open Question, `SPEC_FULL.md` §9).
pub const DEFAULT_TEMPORAL_MIX: f64 = 0.4;

/// Mixing coefficient for activation-weighted retrieval: `alpha * activation
/// + (1 - alpha) * similarity`.
pub const ACTIVATION_WEIGHT_ALPHA: f64 = 0.7;

/// Spreading-activation damping factor applied per hop.
pub const SPREADING_DAMPING: f64 = 0.5;

/// Maximum hop depth for spreading-activation retrieval.
pub const SPREADING_MAX_DEPTH: u32 = 2;

/// Activation boost applied to a thought on `reinforce`.
pub const REINFORCEMENT_BOOST: f64 = 0.25;

/// Half-life, in days, of thought activation decay.
pub const ACTIVATION_HALF_LIFE_DAYS: f64 = 7.0;

/// Half-life, in days, of association weight decay.
pub const ASSOCIATION_HALF_LIFE_DAYS: f64 = 30.0;

/// Minimum cluster size passed to HDBSCAN during concept evolution.
pub const MIN_CLUSTER_SIZE: usize = 4;

/// Maximum number of concepts a single thought may be attached to.
pub const MAX_CONCEPTS_PER_THOUGHT: usize = 3;

/// Centroid similarity above which an incoming cluster is merged into an
/// existing concept outright.
pub const CONCEPT_MERGE_THRESHOLD: f64 = 0.85;

/// Centroid similarity above which an incoming cluster is considered for a
/// split/merge reconciliation against more than one existing concept.
pub const CONCEPT_RECONCILE_THRESHOLD: f64 = 0.70;

/// Centroid similarity below which an incoming cluster is treated as wholly
/// new (a fresh "emerging" concept).
pub const CONCEPT_NEW_THRESHOLD: f64 = 0.60;

/// Consecutive evolution cycles a concept must stay below `MIN_CLUSTER_SIZE`
/// before transitioning to `fading`.
pub const CONCEPT_FADING_CYCLES: u32 = 3;

/// Minimum cycles a concept must have existed before it can be promoted from
/// `emerging` to `established`.
pub const CONCEPT_MIN_CYCLES_FOR_ESTABLISHED: u32 = 2;

/// EWMA smoothing factor (beta) used when folding a new feedback signal into
/// a prompt pattern's `success_score`.
pub const PATTERN_EWMA_BETA: f64 = 0.2;

/// `success_score` threshold above which `evolve` considers a pattern a
/// candidate parent for mutation.
pub const PATTERN_EVOLVE_THRESHOLD: f64 = 0.6;

/// Inherited score multiplier applied to a child pattern spawned by `evolve`.
pub const PATTERN_INHERITANCE_FACTOR: f64 = 0.8;

/// Consecutive low-scoring selections after which a non-seed pattern is
/// retired.
pub const PATTERN_RETIREMENT_SELECTIONS: u64 = 10;

/// Multiplicative jitter range applied to adapted scheduler intervals.
pub const SCHEDULER_JITTER_MIN: f64 = 0.85;
pub const SCHEDULER_JITTER_MAX: f64 = 1.15;

/// Base tick period of the scheduler's cooperative event loop, in seconds.
pub const SCHEDULER_TICK_SECS: u64 = 5;

/// Fraction of tombstoned rows in the flat vector index above which a
/// rebuild-from-scratch compaction is triggered.
pub const INDEX_TOMBSTONE_REBUILD_THRESHOLD: f64 = 0.20;

/// Bound on the single-writer event loop's inbox (`spec.md` §5).
pub const INBOX_CAPACITY: usize = 256;
