use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("week {week} not found (404)")]
    NotFound { week: String },
    #[error("io error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid state file at {path}: {source}")]
    State {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
