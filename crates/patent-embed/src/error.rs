//! Embedding error types.

/// Errors that can occur during embedding generation.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Model initialization failed (download, ONNX runtime, cache issues).
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    /// Embedding generation failed (inference error, invalid input).
    #[error("Embedding generation failed: {0}")]
    EmbedFailed(String),

    /// Model returned zero embeddings for a non-empty input.
    #[error("Empty result from embedding model")]
    EmptyResult,

    /// A returned embedding's dimensionality didn't match what the index expects.
    #[error("embedding dimension {actual} does not match expected {expected} for model {model}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        model: String,
    },

    /// The on-disk cache file was unreadable or corrupt.
    #[error("embedding cache at {path} is unreadable: {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A blocking embedding task panicked or was cancelled.
    #[error("embedding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
