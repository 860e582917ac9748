//! Search error types for patent-search.

/// Errors from hybrid retrieval across the relational store, lexical index,
/// and embedding provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("relational store error: {0}")]
    Db(#[from] patent_db::DbError),

    #[error("lexical index error: {0}")]
    Index(#[from] patent_index::IndexError),

    #[error("embedding error: {0}")]
    Embedding(#[from] patent_embed::EmbeddingError),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
