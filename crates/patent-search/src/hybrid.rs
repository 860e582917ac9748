//! Hybrid fusion of BM25 and vector-similarity hits into a single ranked
//! list, keyed by `chunk_id`.

use std::cmp::Ordering;
use std::collections::HashMap;

use patent_db::VectorHit;
use patent_index::Bm25Hit;
use serde::{Deserialize, Serialize};

pub const W_BM25: f64 = 0.45;
pub const W_VEC: f64 = 0.55;

/// One chunk's fused lexical+vector score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedHit {
    pub chunk_id: String,
    pub publication_number: String,
    pub section_type: String,
    pub text: String,
    pub hybrid_score: f64,
}

/// Fuse BM25 and vector hits by normalizing each side to its own max score,
/// weighting, and summing. Chunks present on only one side get 0 for the
/// other. Ties broken by `chunk_id` ascending.
#[must_use]
pub fn merge_hybrid(
    bm25_hits: &[Bm25Hit],
    vec_hits: &[VectorHit],
    topk: usize,
    w_bm25: f64,
    w_vec: f64,
) -> Vec<FusedHit> {
    let bm25_max = bm25_hits
        .iter()
        .map(|h| f64::from(h.score))
        .fold(0.0_f64, f64::max);
    let bm25_max = if bm25_max > 0.0 { bm25_max } else { 1.0 };

    let vec_max = vec_hits.iter().map(|h| h.score).fold(0.0_f64, f64::max);
    let vec_max = if vec_max > 0.0 { vec_max } else { 1.0 };

    let mut merged: HashMap<String, FusedHit> = HashMap::new();

    for hit in bm25_hits {
        let norm = f64::from(hit.score) / bm25_max;
        let entry = merged.entry(hit.chunk_id.clone()).or_insert_with(|| FusedHit {
            chunk_id: hit.chunk_id.clone(),
            publication_number: hit.publication_number.clone(),
            section_type: hit.section_type.clone(),
            text: hit.text.clone(),
            hybrid_score: 0.0,
        });
        entry.hybrid_score += w_bm25 * norm;
    }

    for hit in vec_hits {
        let norm = hit.score / vec_max;
        let entry = merged.entry(hit.chunk_id.clone()).or_insert_with(|| FusedHit {
            chunk_id: hit.chunk_id.clone(),
            publication_number: hit.publication_number.clone(),
            section_type: hit.section_type.clone(),
            text: hit.text.clone(),
            hybrid_score: 0.0,
        });
        entry.hybrid_score += w_vec * norm;
    }

    let mut results: Vec<FusedHit> = merged.into_values().collect();
    results.sort_by(|a, b| {
        b.hybrid_score
            .partial_cmp(&a.hybrid_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    results.truncate(topk);
    results
}
