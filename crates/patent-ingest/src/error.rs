use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("download error: {0}")]
    Download(#[from] patent_download::DownloadError),

    #[error("relational store error: {0}")]
    Db(#[from] patent_db::DbError),

    #[error("lexical index error: {0}")]
    Index(#[from] patent_index::IndexError),

    #[error("embedding error: {0}")]
    Embedding(#[from] patent_embed::EmbeddingError),

    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error for {path}: {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("sidecar serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
