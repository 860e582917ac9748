use async_trait::async_trait;
use patent_core::chunk::EvidenceChunk;

use crate::error::IndexError;
use crate::types::Bm25Hit;

/// The logical operations a lexical index must support. The wire format is
/// vendor-specific; only these operations are contracted.
#[async_trait]
pub trait LexicalIndex: Send + Sync {
    /// Create the index with a schema declaring `chunk_id`,
    /// `publication_number`, and `section_type` as exact-match keys and
    /// `text` as analyzed full text, if it does not already exist.
    /// Idempotent.
    async fn ensure_index(&self) -> Result<(), IndexError>;

    /// Upsert `chunks` by `chunk_id` without forcing a refresh per document,
    /// then issue a single refresh once the batch is indexed.
    async fn index_chunks(&self, chunks: &[EvidenceChunk]) -> Result<(), IndexError>;

    /// BM25 match over `text`, returning the `topk` highest-scoring hits.
    async fn bm25_search(&self, query: &str, topk: usize) -> Result<Vec<Bm25Hit>, IndexError>;
}
