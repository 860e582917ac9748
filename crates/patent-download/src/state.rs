//! Whole-file persistence of [`IngestionState`] under
//! `{raw_root}/processed_weeks.json`.

use std::path::Path;

use patent_core::state::IngestionState;

use crate::error::DownloadError;

/// Load the processed-weeks state, defaulting to empty if the file is absent.
pub fn load_state(path: &Path) -> Result<IngestionState, DownloadError> {
    if !path.exists() {
        return Ok(IngestionState::new());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| DownloadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DownloadError::State {
        path: path.display().to_string(),
        source,
    })
}

/// Replace the state file wholesale (no partial writes).
pub fn save_state(path: &Path, state: &IngestionState) -> Result<(), DownloadError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(state).map_err(|source| DownloadError::State {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| DownloadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load, mark `week` processed, and save — a single whole-file replacement.
pub fn mark_processed(path: &Path, week: &str) -> Result<(), DownloadError> {
    let mut state = load_state(path)?;
    state.mark_processed(week);
    save_state(path, &state)
}
