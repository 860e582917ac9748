//! Content-addressed disk cache for embedding vectors.
//!
//! Each cached vector is stored as a JSON file named after the SHA-256 hex
//! digest of the text it was computed from, so re-ingesting an already-seen
//! chunk (or re-embedding after a crash) never calls the model again.

use std::path::{Path, PathBuf};

use patent_core::identity::sha256_hex;

use crate::error::EmbeddingError;

pub struct EmbeddingCache {
    dir: PathBuf,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, text_hash: &str) -> PathBuf {
        self.dir.join(format!("{text_hash}.json"))
    }

    /// Look up a cached vector by the SHA-256 hex digest of its source text.
    pub fn get(&self, text_hash: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        let path = self.path_for(text_hash);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| EmbeddingError::Cache {
            path: path.display().to_string(),
            source,
        })?;
        let vector: Vec<f32> = serde_json::from_str(&raw).map_err(|e| EmbeddingError::Cache {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        Ok(Some(vector))
    }

    /// Persist `vector` under the hash of `text`, creating the cache directory
    /// on first use.
    pub fn put(&self, text: &str, vector: &[f32]) -> Result<(), EmbeddingError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| EmbeddingError::Cache {
            path: self.dir.display().to_string(),
            source,
        })?;
        let path = self.path_for(&sha256_hex(text));
        let raw = serde_json::to_string(vector).expect("Vec<f32> always serializes");
        std::fs::write(&path, raw).map_err(|source| EmbeddingError::Cache {
            path: path.display().to_string(),
            source,
        })
    }

    #[must_use]
    pub fn key_for(text: &str) -> String {
        sha256_hex(text)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn miss_on_empty_cache() {
        let dir = tempdir().unwrap();
        let cache = EmbeddingCache::new(dir.path());
        assert_eq!(cache.get(&EmbeddingCache::key_for("hello")).unwrap(), None);
    }

    #[test]
    fn round_trips_a_vector_through_disk() {
        let dir = tempdir().unwrap();
        let cache = EmbeddingCache::new(dir.path());
        let vector = vec![0.1_f32, 0.2, -0.3];

        cache.put("hello world", &vector).unwrap();

        let key = EmbeddingCache::key_for("hello world");
        assert_eq!(cache.get(&key).unwrap(), Some(vector));
    }

    #[test]
    fn distinct_texts_hash_to_distinct_entries() {
        let dir = tempdir().unwrap();
        let cache = EmbeddingCache::new(dir.path());
        cache.put("a widget", &[1.0]).unwrap();
        cache.put("a gadget", &[2.0]).unwrap();

        assert_eq!(
            cache.get(&EmbeddingCache::key_for("a widget")).unwrap(),
            Some(vec![1.0])
        );
        assert_eq!(
            cache.get(&EmbeddingCache::key_for("a gadget")).unwrap(),
            Some(vec![2.0])
        );
    }
}
