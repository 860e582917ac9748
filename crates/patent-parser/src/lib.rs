//! # patent-parser
//!
//! Namespace-agnostic extraction of [`patent_core::record::PatentRecord`]s
//! from PTGRXML grant XML, and the evidence chunker that turns a record into
//! the [`patent_core::chunk::EvidenceChunk`]s the rest of the system indexes.
//!
//! - [`xmltree`] — a minimal local-name-only XML forest, used because real
//!   PTGRXML archives mix namespace conventions across years and sometimes
//!   concatenate document roots without a wrapping element.
//! - [`record`] — `parse_patent_xml`, the record extractor.
//! - [`chunker`] — `build_chunks`, `has_cpc_prefix`.

pub mod chunker;
pub mod error;
pub mod record;
pub mod xmltree;

pub use chunker::{build_chunks, has_cpc_prefix};
pub use error::ParseError;
pub use record::parse_patent_xml;
