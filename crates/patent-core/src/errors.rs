//! Cross-cutting error types for the patent evidence search engine.
//!
//! This module defines errors that can originate from any crate in the
//! system. Domain-specific errors (e.g. `ParseError`, `DbError`) are defined
//! in their respective crates.

use thiserror::Error;

/// Errors that can be raised by code that only depends on `patent-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field was empty or otherwise failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}
