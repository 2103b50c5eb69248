//! Flat L2 vector index (`spec.md` §4.A): brute-force cosine/L2 search over a
//! dense row store. The spec rejects ANN (HNSW/IVF) in favor of exact search
//! since corpora stay small and recall matters more than latency; the
//! id<->row bookkeeping and serde persistence shape are grounded on
//! `zoey-storage-vector::store::LocalVectorStore`'s `StoreMetadata`, even
//! though the search itself is intentionally not approximate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use substrate_core::constants::INDEX_TOMBSTONE_REBUILD_THRESHOLD;
use substrate_core::ThoughtId;

/// On-disk representation of the index (`vector_index.bin`, bincode-encoded).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlatIndex {
    dimensions: usize,
    backend_name: String,
    rows: Vec<Option<Vec<f32>>>,
    id_to_row: HashMap<ThoughtId, usize>,
    row_to_id: Vec<Option<ThoughtId>>,
    tombstones: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredId {
    pub id: ThoughtId,
    pub score: f32,
}

impl FlatIndex {
    pub fn new(dimensions: usize, backend_name: impl Into<String>) -> Self {
        Self {
            dimensions,
            backend_name: backend_name.into(),
            rows: Vec::new(),
            id_to_row: HashMap::new(),
            row_to_id: Vec::new(),
            tombstones: 0,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn len(&self) -> usize {
        self.id_to_row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_row.is_empty()
    }

    /// Insert or overwrite the vector for `id`.
    pub fn upsert(&mut self, id: ThoughtId, vector: Vec<f32>) {
        debug_assert_eq!(vector.len(), self.dimensions);
        if let Some(&row) = self.id_to_row.get(&id) {
            self.rows[row] = Some(vector);
            return;
        }
        let row = self.rows.len();
        self.rows.push(Some(vector));
        self.row_to_id.push(Some(id.clone()));
        self.id_to_row.insert(id, row);
    }

    /// Tombstone `id`'s row. Triggers a compaction if the tombstone fraction
    /// exceeds `INDEX_TOMBSTONE_REBUILD_THRESHOLD`.
    pub fn remove(&mut self, id: &ThoughtId) {
        if let Some(row) = self.id_to_row.remove(id) {
            self.rows[row] = None;
            self.row_to_id[row] = None;
            self.tombstones += 1;
            if self.tombstone_fraction() > INDEX_TOMBSTONE_REBUILD_THRESHOLD {
                self.compact();
            }
        }
    }

    fn tombstone_fraction(&self) -> f64 {
        if self.rows.is_empty() {
            0.0
        } else {
            self.tombstones as f64 / self.rows.len() as f64
        }
    }

    /// Rebuild the dense row store from scratch, dropping tombstoned rows.
    pub fn compact(&mut self) {
        let mut new_rows = Vec::with_capacity(self.id_to_row.len());
        let mut new_row_to_id = Vec::with_capacity(self.id_to_row.len());
        let mut new_id_to_row = HashMap::with_capacity(self.id_to_row.len());

        for (row, vector) in self.rows.drain(..).enumerate() {
            if let Some(vector) = vector {
                let id = self.row_to_id[row].clone().expect("row has vector but no id");
                let new_row = new_rows.len();
                new_rows.push(Some(vector));
                new_row_to_id.push(Some(id.clone()));
                new_id_to_row.insert(id, new_row);
            }
        }

        self.rows = new_rows;
        self.row_to_id = new_row_to_id;
        self.id_to_row = new_id_to_row;
        self.tombstones = 0;
    }

    /// The stored vector for `id`, if present and not tombstoned.
    pub fn vector(&self, id: &ThoughtId) -> Option<&[f32]> {
        let &row = self.id_to_row.get(id)?;
        self.rows[row].as_deref()
    }

    /// Exact top-k by cosine similarity.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredId> {
        let mut scored: Vec<ScoredId> = self
            .rows
            .iter()
            .zip(self.row_to_id.iter())
            .filter_map(|(row, id)| match (row, id) {
                (Some(vector), Some(id)) => Some(ScoredId {
                    id: id.clone(),
                    score: cosine(query, vector),
                }),
                _ => None,
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
