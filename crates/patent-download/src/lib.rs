//! # patent-download
//!
//! Weekly PTGRXML archive discovery (dataset-page scrape, with a search-API
//! fallback), resumable HTTP download, and the processed-weeks watermark.
//!
//! - [`discovery`] — pure parsing of both discovery response shapes.
//! - [`client`] — `PtgrxmlDownloader`, the stateful client tying discovery,
//!   `select_weeks`, and `download_week` together.
//! - [`state`] — whole-file persistence of [`patent_core::state::IngestionState`].

pub mod client;
pub mod discovery;
pub mod error;
pub mod state;

pub use client::PtgrxmlDownloader;
pub use error::DownloadError;
