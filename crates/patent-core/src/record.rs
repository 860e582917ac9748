//! `PatentRecord` and `Claim` — the parser's normalized output.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One granted patent extracted from a PTGRXML weekly archive.
///
/// Produced exclusively by the parser and never mutated in place once handed
/// to the ingest orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PatentRecord {
    /// Unique identity, e.g. `"US1234567B2"`. Always non-empty.
    pub publication_number: String,
    /// Compact `YYYYMMDD` grant date, or `None` if absent from the source.
    pub grant_date: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Ordered paragraphs captured under a `summary`/`summary-of-invention` subtree.
    pub summary_paragraphs: Vec<String>,
    /// Ordered paragraphs captured under `description`/`detailed-description`,
    /// disjoint from `summary_paragraphs`.
    pub description_paragraphs: Vec<String>,
    pub claims: Vec<Claim>,
    /// Deduplicated on write; duplicates from the source are permitted here.
    pub cpc_codes: Vec<String>,
    /// Cited publication numbers, in document order.
    pub citations: Vec<String>,
    /// Opaque key/value map preserving canonical identity fields for sidecar storage.
    pub raw: BTreeMap<String, String>,
}

impl PatentRecord {
    /// True when any CPC code starts with `prefix` (case-insensitive).
    #[must_use]
    pub fn has_cpc_prefix(&self, prefix: &str) -> bool {
        let needle = prefix.to_uppercase();
        self.cpc_codes
            .iter()
            .any(|code| code.to_uppercase().starts_with(&needle))
    }
}

/// A single claim within a `PatentRecord`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Claim {
    /// Typically numeric, e.g. `"2"`.
    pub claim_num: String,
    /// Normalized claim text.
    pub text: String,
    /// `is_dependent ⇔ (depends_on ≠ ∅ ∨ text matches the dependency cue pattern)`.
    pub is_dependent: bool,
    /// Referenced claim numbers, in the order they appear in `text`.
    pub depends_on: Vec<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make(cpc: Vec<&str>) -> PatentRecord {
        PatentRecord {
            publication_number: "US1".to_string(),
            grant_date: None,
            title: String::new(),
            abstract_text: String::new(),
            summary_paragraphs: Vec::new(),
            description_paragraphs: Vec::new(),
            claims: Vec::new(),
            cpc_codes: cpc.into_iter().map(str::to_string).collect(),
            citations: Vec::new(),
            raw: BTreeMap::new(),
        }
    }

    #[test]
    fn has_cpc_prefix_matches_case_insensitively() {
        let p = make(vec!["H04L12/58", "G06F17/30"]);
        assert!(p.has_cpc_prefix("G06F"));
        assert!(p.has_cpc_prefix("g06f"));
    }

    #[test]
    fn has_cpc_prefix_false_when_no_match() {
        let p = make(vec!["H04L12/58"]);
        assert!(!p.has_cpc_prefix("G06F"));
    }

    #[test]
    fn has_cpc_prefix_false_on_empty_codes() {
        assert!(!make(vec![]).has_cpc_prefix("G06F"));
    }
}
