//! Content-addressed hashing: text hashes and chunk ids.
//!
//! `chunk_id` depends only on `(publication_number, section_type, key,
//! normalized_text)`. Metadata never enters the hash, so attaching or
//! changing metadata on an existing chunk never changes its identity;
//! changing the text always does.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the UTF-8 encoding of `input`.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive a stable content-addressed chunk id.
///
/// `text` must already be normalized by the caller — the id is defined over
/// normalized text, not raw text.
#[must_use]
pub fn chunk_id(publication_number: &str, section_type: &str, key: &str, text: &str) -> String {
    let text_hash = sha256_hex(text);
    let raw = format!("{publication_number}|{section_type}|{key}|{text_hash}");
    sha256_hex(&raw)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sha256_hex_is_stable_and_lowercase() {
        let digest = sha256_hex("hello");
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn chunk_id_depends_only_on_identity_fields() {
        let id1 = chunk_id("US1234567B2", "CLAIM", "1", "a widget");
        let id2 = chunk_id("US1234567B2", "CLAIM", "1", "a widget");
        assert_eq!(id1, id2);
    }

    #[test]
    fn chunk_id_changes_with_text() {
        let id1 = chunk_id("US1234567B2", "CLAIM", "1", "a widget");
        let id2 = chunk_id("US1234567B2", "CLAIM", "1", "a gadget");
        assert_ne!(id1, id2);
    }

    #[test]
    fn chunk_id_changes_with_section_or_key() {
        let base = chunk_id("US1", "CLAIM", "1", "text");
        assert_ne!(base, chunk_id("US1", "ABSTRACT", "1", "text"));
        assert_ne!(base, chunk_id("US1", "CLAIM", "2", "text"));
        assert_ne!(base, chunk_id("US2", "CLAIM", "1", "text"));
    }
}
