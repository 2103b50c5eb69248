use std::path::PathBuf;

/// Errors from the JSON/blob persistence layer (`spec.md` §6, §7).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize {what}: {source}")]
    Serde {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to (de)serialize vector index: {source}")]
    Bincode {
        #[source]
        source: bincode::Error,
    },

    #[error("state file '{path}' is corrupt: {details}")]
    Corrupt { path: PathBuf, details: String },

    #[error("could not acquire exclusive lock on data directory '{path}'")]
    DirectoryLocked { path: PathBuf },
}
