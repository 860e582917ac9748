//! Roll fused chunk hits up to per-patent scores.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hybrid::FusedHit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentAggregate {
    pub publication_number: String,
    pub score: f64,
    pub supporting_chunks: usize,
}

/// Group fused hits by `publication_number`: score is the max `hybrid_score`
/// among its chunks, `supporting_chunks` their count. Sorted by score
/// descending, ties broken by publication number ascending.
#[must_use]
pub fn aggregate_patents(chunks: &[FusedHit]) -> Vec<PatentAggregate> {
    let mut by_patent: HashMap<&str, PatentAggregate> = HashMap::new();
    for chunk in chunks {
        let entry = by_patent
            .entry(chunk.publication_number.as_str())
            .or_insert_with(|| PatentAggregate {
                publication_number: chunk.publication_number.clone(),
                score: f64::MIN,
                supporting_chunks: 0,
            });
        entry.score = entry.score.max(chunk.hybrid_score);
        entry.supporting_chunks += 1;
    }

    let mut out: Vec<PatentAggregate> = by_patent.into_values().collect();
    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.publication_number.cmp(&b.publication_number))
    });
    out
}
