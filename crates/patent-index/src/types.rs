use serde::{Deserialize, Serialize};

/// A single lexical-index hit, carrying enough of the source chunk to
/// fuse with vector results without a round trip to the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm25Hit {
    pub chunk_id: String,
    pub publication_number: String,
    pub section_type: String,
    pub text: String,
    pub score: f32,
    pub highlights: Vec<String>,
}
