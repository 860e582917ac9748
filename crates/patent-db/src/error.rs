use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("duckdb error: {0}")]
    Duckdb(#[from] duckdb::Error),
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
    #[error("database worker task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}
