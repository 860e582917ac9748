//! # patent-db
//!
//! A DuckDB-backed relational store for patents, their CPC/citation
//! associations, and evidence chunks — including the vector column and
//! cosine-similarity search the retrieval engine reads at query time.
//!
//! - [`schema`] — DDL, the VSS extension setup, and the vector literal helper.
//! - [`store`] — `RelationalStore`, the async-friendly operation surface.

pub mod error;
pub mod schema;
pub mod store;

pub use error::DbError;
pub use schema::EXPECTED_DIM;
pub use store::{RelationalStore, VectorHit};
