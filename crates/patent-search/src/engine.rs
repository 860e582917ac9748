//! `run_search` — the end-to-end hybrid retrieval pipeline: BM25 + vector
//! fusion, optional citation/CPC graph expansion, and patent aggregation.

use std::cmp::Ordering;

use patent_db::RelationalStore;
use patent_embed::EmbeddingProvider;
use patent_index::LexicalIndex;
use serde::{Deserialize, Serialize};

use crate::aggregate::{PatentAggregate, aggregate_patents};
use crate::error::SearchError;
use crate::hybrid::{FusedHit, W_BM25, W_VEC, merge_hybrid};

/// Publications within `graph_expand`'s neighbor lookup are bounded by this
/// many results per branch (citations, shared CPC).
const GRAPH_NEIGHBOR_LIMIT: usize = 100;

/// Only the highest-ranked fused hits seed graph expansion.
const GRAPH_SEED_COUNT: usize = 50;

/// Graph-adjacent hits are boosted by this multiplier before the final sort.
const GRAPH_BOOST: f64 = 1.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunks: Vec<FusedHit>,
    pub patents: Vec<PatentAggregate>,
}

#[allow(clippy::too_many_arguments)]
pub async fn run_search(
    index: &dyn LexicalIndex,
    store: &RelationalStore,
    embedder: &dyn EmbeddingProvider,
    query: &str,
    topk: usize,
    topk_bm25: usize,
    topk_vec: usize,
    graph_expand: bool,
) -> Result<SearchResult, SearchError> {
    let bm25_hits = index.bm25_search(query, topk_bm25).await?;

    let query_vectors = embedder.embed(&[query.to_string()]).await?;
    let query_vector = query_vectors
        .into_iter()
        .next()
        .ok_or_else(|| SearchError::InvalidQuery("embedding provider returned no vector".into()))?;
    let vec_hits = store.vector_search(query_vector, topk_vec).await?;

    let fuse_limit = topk.max(200);
    let mut fused = merge_hybrid(&bm25_hits, &vec_hits, fuse_limit, W_BM25, W_VEC);

    if graph_expand {
        let mut seeds: Vec<String> = fused
            .iter()
            .take(GRAPH_SEED_COUNT)
            .map(|h| h.publication_number.clone())
            .collect();
        seeds.sort();
        seeds.dedup();

        let neighbors = store.graph_neighbors(seeds, GRAPH_NEIGHBOR_LIMIT).await?;
        let neighbors: std::collections::HashSet<String> = neighbors.into_iter().collect();

        for hit in &mut fused {
            if neighbors.contains(&hit.publication_number) {
                hit.hybrid_score *= GRAPH_BOOST;
            }
        }
        fused.sort_by(|a, b| {
            b.hybrid_score
                .partial_cmp(&a.hybrid_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
    }

    fused.truncate(topk);
    let patents = aggregate_patents(&fused);

    Ok(SearchResult { chunks: fused, patents })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use patent_core::chunk::EvidenceChunk;
    use patent_db::VectorHit;
    use patent_embed::EmbeddingError;
    use patent_index::{Bm25Hit, IndexError};
    use pretty_assertions::assert_eq;

    use super::*;

    struct FakeIndex {
        hits: Vec<Bm25Hit>,
    }

    #[async_trait]
    impl LexicalIndex for FakeIndex {
        async fn ensure_index(&self) -> Result<(), IndexError> {
            Ok(())
        }

        async fn index_chunks(&self, _chunks: &[EvidenceChunk]) -> Result<(), IndexError> {
            Ok(())
        }

        async fn bm25_search(&self, _query: &str, topk: usize) -> Result<Vec<Bm25Hit>, IndexError> {
            Ok(self.hits.iter().take(topk).cloned().collect())
        }
    }

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![0.0_f32; patent_embed::EXPECTED_DIM]).collect())
        }
    }

    fn bm25(chunk_id: &str, publication: &str, score: f32) -> Bm25Hit {
        Bm25Hit {
            chunk_id: chunk_id.to_string(),
            publication_number: publication.to_string(),
            section_type: "CLAIM".to_string(),
            text: "some widget claim".to_string(),
            score,
            highlights: Vec::new(),
        }
    }

    #[tokio::test]
    async fn runs_end_to_end_and_aggregates_by_patent() {
        let store = RelationalStore::open_in_memory().unwrap();
        let index = FakeIndex {
            hits: vec![bm25("c1", "US1", 3.0), bm25("c2", "US1", 1.0)],
        };
        let embedder = FakeEmbedder;

        let result = run_search(&index, &store, &embedder, "widget", 10, 10, 10, false)
            .await
            .unwrap();

        assert_eq!(result.chunks.len(), 2);
        assert_eq!(result.patents.len(), 1);
        assert_eq!(result.patents[0].publication_number, "US1");
        assert_eq!(result.patents[0].supporting_chunks, 2);
    }

    #[tokio::test]
    async fn graph_expand_boosts_neighbor_publications_before_resort() {
        let store = RelationalStore::open_in_memory().unwrap();
        store
            .upsert_patent(patent_core::record::PatentRecord {
                publication_number: "US1".to_string(),
                grant_date: None,
                title: String::new(),
                abstract_text: String::new(),
                summary_paragraphs: Vec::new(),
                description_paragraphs: Vec::new(),
                claims: Vec::new(),
                cpc_codes: vec!["G06F17/30".to_string()],
                citations: vec!["US2".to_string()],
                raw: std::collections::BTreeMap::new(),
            })
            .await
            .unwrap();

        let index = FakeIndex {
            hits: vec![bm25("c1", "US1", 1.0), bm25("c2", "US2", 0.99)],
        };
        let embedder = FakeEmbedder;

        let without_expand = run_search(&index, &store, &embedder, "widget", 10, 10, 10, false)
            .await
            .unwrap();
        let with_expand = run_search(&index, &store, &embedder, "widget", 10, 10, 10, true)
            .await
            .unwrap();

        let us2_without = without_expand
            .chunks
            .iter()
            .find(|c| c.publication_number == "US2")
            .unwrap()
            .hybrid_score;
        let us2_with = with_expand
            .chunks
            .iter()
            .find(|c| c.publication_number == "US2")
            .unwrap()
            .hybrid_score;
        assert!(us2_with > us2_without, "US2 is cited by US1 and should be boosted");
    }
}
