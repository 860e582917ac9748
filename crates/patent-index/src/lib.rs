//! # patent-index
//!
//! The lexical half of hybrid retrieval: a BM25 index over evidence chunks
//! reached over an OpenSearch-compatible HTTP transport. The wire format is
//! vendor-specific; only the logical operations in [`LexicalIndex`] are
//! contracted.

pub mod client;
pub mod error;
pub mod r#trait;
pub mod types;

pub use client::OpenSearchIndex;
pub use error::IndexError;
pub use r#trait::LexicalIndex;
pub use types::Bm25Hit;
