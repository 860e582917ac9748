//! `EvidenceChunk` — the retrieval atom.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::{chunk_id, sha256_hex};

/// The section of a patent a chunk was extracted from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionType {
    Claim,
    Abstract,
    Summary,
    Description,
}

impl SectionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "CLAIM",
            Self::Abstract => "ABSTRACT",
            Self::Summary => "SUMMARY",
            Self::Description => "DESCRIPTION",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded textual evidence unit used as the retrieval atom: a claim, the
/// abstract, or a paragraph slice.
///
/// `chunk_id` is content-addressed — see [`crate::identity::chunk_id`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EvidenceChunk {
    pub chunk_id: String,
    pub publication_number: String,
    pub section_type: SectionType,
    pub text: String,
    /// Hex SHA-256 of `text`.
    pub text_hash: String,
    pub claim_num: Option<String>,
    /// Section-scoped ordinal, e.g. `"summary_1_2"`.
    pub para_id: Option<String>,
    pub is_dependent: Option<bool>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl EvidenceChunk {
    /// Build a chunk, deriving `chunk_id` and `text_hash` from `text`.
    ///
    /// `key` is the identity-scoped key passed to [`crate::identity::chunk_id`]
    /// (claim number for claims, `"abstract"` for the abstract, or the
    /// section-scoped paragraph id).
    #[must_use]
    pub fn new(
        publication_number: impl Into<String>,
        section_type: SectionType,
        key: &str,
        text: impl Into<String>,
    ) -> Self {
        let publication_number = publication_number.into();
        let text = text.into();
        let id = chunk_id(&publication_number, section_type.as_str(), key, &text);
        let text_hash = sha256_hex(&text);
        Self {
            chunk_id: id,
            publication_number,
            section_type,
            text,
            text_hash,
            claim_num: None,
            para_id: None,
            is_dependent: None,
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_claim(mut self, claim_num: impl Into<String>, is_dependent: bool) -> Self {
        self.claim_num = Some(claim_num.into());
        self.is_dependent = Some(is_dependent);
        self
    }

    #[must_use]
    pub fn with_para_id(mut self, para_id: impl Into<String>) -> Self {
        self.para_id = Some(para_id.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_derives_chunk_id_and_text_hash() {
        let chunk = EvidenceChunk::new("US1", SectionType::Claim, "1", "a widget");
        assert_eq!(chunk.text_hash, sha256_hex("a widget"));
        assert_eq!(
            chunk.chunk_id,
            chunk_id("US1", "CLAIM", "1", "a widget")
        );
    }

    #[test]
    fn metadata_does_not_affect_identity() {
        let base = EvidenceChunk::new("US1", SectionType::Claim, "1", "a widget");
        let tagged = base.clone().with_metadata("depends_on", Value::Array(vec![]));
        assert_eq!(base.chunk_id, tagged.chunk_id);
    }

    #[test]
    fn changing_text_changes_identity() {
        let a = EvidenceChunk::new("US1", SectionType::Claim, "1", "a widget");
        let b = EvidenceChunk::new("US1", SectionType::Claim, "1", "a gadget");
        assert_ne!(a.chunk_id, b.chunk_id);
    }

    #[test]
    fn section_type_serializes_uppercase() {
        assert_eq!(SectionType::Claim.as_str(), "CLAIM");
        assert_eq!(SectionType::Description.as_str(), "DESCRIPTION");
    }
}
