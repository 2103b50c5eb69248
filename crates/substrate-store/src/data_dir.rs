//! Named paths inside the substrate data directory (`spec.md` §6).

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DataDirLayout {
    root: PathBuf,
}

impl DataDirLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn thoughts(&self) -> PathBuf {
        self.root.join("thoughts.json")
    }

    pub fn associations(&self) -> PathBuf {
        self.root.join("thought_associations.json")
    }

    pub fn vector_index(&self) -> PathBuf {
        self.root.join("vector_index.bin")
    }

    pub fn concepts(&self) -> PathBuf {
        self.root.join("evolved_concepts.json")
    }

    pub fn prompt_patterns(&self) -> PathBuf {
        self.root.join("prompt_patterns.json")
    }

    pub fn scheduler_state(&self) -> PathBuf {
        self.root.join("scheduler_state.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
