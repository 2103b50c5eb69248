//! Substrate configuration, assembled from per-subsystem configs the way
//! `cortex-core::config` groups `DecayConfig` / `ConsolidationConfig` /
//! `MultiagentConfig` under one umbrella.

mod concept_config;
mod memory_config;
mod prompt_config;
mod scheduler_config;

pub use concept_config::ConceptConfig;
pub use memory_config::MemoryConfig;
pub use prompt_config::PromptConfig;
pub use scheduler_config::SchedulerConfig;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for a substrate instance (`spec.md` §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstrateConfig {
    /// Directory holding all persisted state (`thoughts.json`,
    /// `vector_index.bin`, etc). Created on first run if absent.
    pub data_dir: PathBuf,
    /// Name of the embedding backend to construct. `"hash"` selects the
    /// built-in deterministic embedder.
    pub embedding_backend: String,
    /// Base URL of an LLM backend used by pattern extraction, if configured.
    pub llm_backend_url: Option<String>,
    /// Whether multiple devices may share `data_dir` concurrently. When
    /// `false` (default) the directory lock is held for the process
    /// lifetime; when `true` call sites are expected to use short-lived
    /// locks around each write (not implemented — see `SPEC_FULL.md` §9).
    pub multi_device: bool,
    pub memory: MemoryConfig,
    pub concepts: ConceptConfig,
    pub prompts: PromptConfig,
    pub scheduler: SchedulerConfig,
}

impl Default for SubstrateConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./substrate-data"),
            embedding_backend: "hash".to_string(),
            llm_backend_url: None,
            multi_device: false,
            memory: MemoryConfig::default(),
            concepts: ConceptConfig::default(),
            prompts: PromptConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl SubstrateConfig {
    /// Overlay environment variables onto the defaults (`spec.md` §6):
    /// `SUBSTRATE_DATA_DIR`, `SUBSTRATE_EMBEDDING_BACKEND`,
    /// `SUBSTRATE_LLM_BACKEND_URL`, `SUBSTRATE_MULTI_DEVICE`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(dir) = std::env::var("SUBSTRATE_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Ok(backend) = std::env::var("SUBSTRATE_EMBEDDING_BACKEND") {
            cfg.embedding_backend = backend;
        }
        if let Ok(url) = std::env::var("SUBSTRATE_LLM_BACKEND_URL") {
            cfg.llm_backend_url = Some(url);
        }
        if let Ok(flag) = std::env::var("SUBSTRATE_MULTI_DEVICE") {
            cfg.multi_device = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        cfg
    }
}
