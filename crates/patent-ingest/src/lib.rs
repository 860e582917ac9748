//! # patent-ingest
//!
//! The weekly ingest orchestrator: wires `patent-download`, `patent-parser`,
//! `patent-db`, `patent-index`, and `patent-embed` together into the
//! download → parse → filter → chunk → persist → embed pipeline.

pub mod error;
pub mod orchestrator;

pub use error::IngestError;
pub use orchestrator::run_ingest;
