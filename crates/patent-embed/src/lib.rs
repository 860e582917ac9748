//! # patent-embed
//!
//! Local embedding generation over evidence chunks via fastembed (ONNX
//! runtime), fronted by a content-addressed disk cache so a re-ingested
//! chunk never pays for inference twice.
//!
//! - [`provider`] — `EmbeddingProvider` and the `BGEBaseENV15`-backed
//!   `FastEmbedProvider` (768-dim, matching [`EXPECTED_DIM`]).
//! - [`cache`] — the on-disk vector cache keyed by text hash.

pub mod cache;
pub mod error;
pub mod provider;

pub use cache::EmbeddingCache;
pub use error::EmbeddingError;
pub use provider::{EXPECTED_DIM, EmbeddingProvider, FastEmbedProvider};
