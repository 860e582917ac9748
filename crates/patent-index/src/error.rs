use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("index creation failed: {0}")]
    IndexCreation(String),
}
