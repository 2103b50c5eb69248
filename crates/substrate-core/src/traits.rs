//! Cross-crate seam traits, mirroring `cortex-core::traits`.

use async_trait::async_trait;

use crate::errors::BackendError;

/// Implemented by embedding backends (`spec.md` §4.A). The substrate ships a
/// deterministic, network-free implementation in `substrate-embeddings`;
/// callers may supply their own (e.g. an LLM-hosted embedding endpoint).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError>;

    /// Embed a batch of texts. Implementors may override this for batching
    /// efficiency; the default folds over `embed`.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Fixed output dimensionality of this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable backend name, persisted alongside the vector index so
    /// a dimension/backend mismatch can be detected on reload.
    fn name(&self) -> &str;
}
