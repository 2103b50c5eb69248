use std::sync::Arc;

use substrate_core::errors::{BackendError, SubstrateError};
use substrate_core::EmbeddingProvider;
use substrate_embeddings::HashEmbeddingProvider;

/// Hash embeddings are 256-dimensional: enough buckets to keep unrelated
/// terms from colliding while staying small for the in-process flat index.
const HASH_DIMENSIONS: usize = 256;

/// Build the configured embedding backend. Only the built-in `"hash"`
/// backend is implemented; anything else surfaces as an unavailable
/// backend rather than a panic, since a caller may legitimately configure
/// one of their own `EmbeddingProvider` implementations directly instead of
/// going through this factory.
pub fn build_embedder(name: &str) -> Result<Arc<dyn EmbeddingProvider>, SubstrateError> {
    match name {
        "hash" => Ok(Arc::new(HashEmbeddingProvider::new(HASH_DIMENSIONS))),
        other => Err(SubstrateError::BackendUnavailable(BackendError::EmbeddingUnavailable {
            name: other.to_string(),
            reason: "no built-in provider registered under this name".to_string(),
        })),
    }
}
