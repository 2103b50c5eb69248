//! Density-based clustering of active thoughts into concept candidates
//! (`spec.md` §4.C), grounded on
//! `cortex-consolidation::pipeline::phase2_clustering::cluster_candidates`.
//! The teacher mixes in file/pattern/tag overlap signals specific to a code
//! assistant; this substrate only has embeddings to cluster on, so the
//! composite feature vector reduces to the embedding alone.

use std::collections::HashMap;

use hdbscan::{Hdbscan, HdbscanHyperParams};

#[derive(Debug, Clone)]
pub struct ClusterResult {
    pub clusters: Vec<Vec<usize>>,
    pub noise: Vec<usize>,
}

/// Cluster `embeddings` (one per candidate, same order) with HDBSCAN.
/// Candidate counts below `min_cluster_size` are returned as all-noise.
pub fn cluster_embeddings(embeddings: &[Vec<f32>], min_cluster_size: usize) -> ClusterResult {
    if embeddings.len() < min_cluster_size {
        return ClusterResult {
            clusters: vec![],
            noise: (0..embeddings.len()).collect(),
        };
    }

    let hyper_params = HdbscanHyperParams::builder()
        .min_cluster_size(min_cluster_size)
        .min_samples(1)
        .build();

    let clusterer = Hdbscan::new(embeddings, hyper_params);
    let labels = match clusterer.cluster() {
        Ok(l) => l,
        Err(_) => {
            return ClusterResult {
                clusters: vec![],
                noise: (0..embeddings.len()).collect(),
            }
        }
    };

    let mut cluster_map: HashMap<i32, Vec<usize>> = HashMap::new();
    let mut noise = Vec::new();
    for (idx, &label) in labels.iter().enumerate() {
        if label < 0 {
            noise.push(idx);
        } else {
            cluster_map.entry(label).or_default().push(idx);
        }
    }

    let mut clusters: Vec<Vec<usize>> = cluster_map.into_values().collect();
    clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));

    ClusterResult { clusters, noise }
}

/// Mean vector of `embeddings[indices]`, L2-normalized.
pub fn centroid(embeddings: &[Vec<f32>], indices: &[usize]) -> Vec<f32> {
    let dim = embeddings.first().map(|e| e.len()).unwrap_or(0);
    let mut sum = vec![0.0f32; dim];
    for &i in indices {
        for (d, v) in embeddings[i].iter().enumerate() {
            sum[d] += v;
        }
    }
    let n = indices.len().max(1) as f32;
    for v in &mut sum {
        *v /= n;
    }
    let norm: f32 = sum.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in &mut sum {
            *v /= norm;
        }
    }
    sum
}

/// Membership-weighted mean of two already-computed centroids, L2-normalized
/// (`spec.md` §4.C: "update centroid as membership-weighted mean" on merge
/// and reconcile, as opposed to overwriting it with the incoming cluster).
pub fn weighted_centroid(existing: &[f32], existing_weight: f64, incoming: &[f32], incoming_weight: f64) -> Vec<f32> {
    let total = (existing_weight + incoming_weight).max(f64::EPSILON);
    let dim = existing.len().max(incoming.len());
    let mut out = vec![0.0f32; dim];
    for (d, slot) in out.iter_mut().enumerate() {
        let a = existing.get(d).copied().unwrap_or(0.0) as f64;
        let b = incoming.get(d).copied().unwrap_or(0.0) as f64;
        *slot = ((a * existing_weight + b * incoming_weight) / total) as f32;
    }
    let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in &mut out {
            *v /= norm;
        }
    }
    out
}

pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        0.0
    } else {
        (dot / (norm_a * norm_b)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_candidates_returns_all_as_noise() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let result = cluster_embeddings(&embeddings, 4);
        assert!(result.clusters.is_empty());
        assert_eq!(result.noise.len(), 2);
    }

    #[test]
    fn centroid_is_mean_and_normalized() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let c = centroid(&embeddings, &[0, 1]);
        let norm: f32 = c.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn weighted_centroid_leans_toward_the_heavier_side() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let c = weighted_centroid(&a, 9.0, &b, 1.0);
        assert!(c[0] > c[1], "a nine-member concept merging one new member should stay close to its own centroid");
    }

    #[test]
    fn weighted_centroid_is_normalized() {
        let a = vec![1.0, 0.0];
        let b = vec![0.3, 0.4];
        let c = weighted_centroid(&a, 2.0, &b, 3.0);
        let norm: f32 = c.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
