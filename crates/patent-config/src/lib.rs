//! # patent-config
//!
//! Layered configuration loading using figment: environment variables over
//! built-in defaults. Config is an immutable record constructed once at
//! process start and passed explicitly to each component — no process-wide
//! singleton.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::Config;
