//! # patent-core
//!
//! Core types, text normalization, content identity, and error types shared
//! across the patent evidence search engine.
//!
//! This crate provides the foundational pieces every other crate builds on:
//! - [`record`] — `PatentRecord` / `Claim`, the normalized output of the parser.
//! - [`chunk`] — `EvidenceChunk`, the retrieval atom stored in the relational
//!   store and mirrored into the lexical index.
//! - [`text`] — Unicode normalization, dehyphenation, and overlap-aware
//!   paragraph splitting.
//! - [`identity`] — content-addressed hashing used to derive stable chunk ids.
//! - [`state`] — per-source ingestion watermark (`IngestionState`).
//! - [`errors`] — cross-cutting error type for the crates that don't define
//!   their own domain-specific error.

pub mod chunk;
pub mod errors;
pub mod identity;
pub mod record;
pub mod state;
pub mod text;

pub use chunk::{EvidenceChunk, SectionType};
pub use errors::CoreError;
pub use record::{Claim, PatentRecord};
pub use state::IngestionState;
