//! `IngestionState` — per-source ingestion watermark.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The set of week ids (`YYYYMMDD`) already processed for one source, e.g.
/// `"ptgrxml"`. Mutated by the orchestrator at the end of each successfully
/// processed week; never partially written (whole-file replacement).
///
/// Serializes as a flat, sorted JSON array (`processed_weeks.json`), not an
/// object — `#[serde(transparent)]` makes the wrapper invisible on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IngestionState {
    processed_weeks: BTreeSet<String>,
}

impl IngestionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_processed(&self, week: &str) -> bool {
        self.processed_weeks.contains(week)
    }

    pub fn mark_processed(&mut self, week: impl Into<String>) {
        self.processed_weeks.insert(week.into());
    }

    #[must_use]
    pub fn processed_weeks(&self) -> &BTreeSet<String> {
        &self.processed_weeks
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn marks_and_queries_processed_weeks() {
        let mut state = IngestionState::new();
        assert!(!state.is_processed("20240213"));
        state.mark_processed("20240213");
        assert!(state.is_processed("20240213"));
    }

    #[test]
    fn serializes_as_sorted_json_array() {
        let mut state = IngestionState::new();
        state.mark_processed("20240213");
        state.mark_processed("20240102");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"["20240102","20240213"]"#);
    }
}
