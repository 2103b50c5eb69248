//! Crash-safe JSON and blob writes.
//!
//! Every write goes to a `.tmp` sibling, is `fsync`'d, then renamed over the
//! target. A crash before the rename leaves the original file untouched; a
//! crash after leaves a consistent new file. Grounded on the
//! `MemoryEventLog::overwrite` temp-then-rename sequence.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use substrate_core::errors::StoreError;

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| "state".to_string());
    path.with_file_name(format!("{filename}.tmp"))
}

async fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let tmp_path = tmp_path_for(path);

    let write_result: Result<(), StoreError> = async {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        file.write_all(bytes).await.map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        file.flush().await.map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        file.sync_all().await.map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        Ok(())
    }
    .await;

    if let Err(err) = write_result {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(err);
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|source| {
            let _ = std::fs::remove_file(&tmp_path);
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let what = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serde {
        what,
        source,
    })?;
    write_bytes_atomic(path, &bytes).await
}

/// Load and deserialize a JSON file, returning `None` if it does not exist.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                details: source.to_string(),
            })?;
            Ok(Some(value))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serialize `value` with bincode and atomically replace `path` (used for
/// the opaque vector-index blob).
pub async fn write_blob<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = bincode::serialize(value).map_err(|source| StoreError::Bincode { source })?;
    write_bytes_atomic(path, &bytes).await
}

/// Load and deserialize a bincode blob, returning `None` if it does not exist.
pub async fn read_blob<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = bincode::deserialize(&bytes).map_err(|source| StoreError::Bincode { source })?;
            Ok(Some(value))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        a: u32,
        b: String,
    }

    #[tokio::test]
    async fn json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        let value = Sample {
            a: 7,
            b: "hi".into(),
        };
        write_json(&path, &value).await.unwrap();
        let loaded: Sample = read_json(&path).await.unwrap().unwrap();
        assert_eq!(loaded, value);
        assert!(!tmp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn read_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let loaded: Option<Sample> = read_json(&path).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn blob_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let value = vec![1u8, 2, 3, 4];
        write_blob(&path, &value).await.unwrap();
        let loaded: Vec<u8> = read_blob(&path).await.unwrap().unwrap();
        assert_eq!(loaded, value);
    }
}
