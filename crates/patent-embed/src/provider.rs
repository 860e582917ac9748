//! Embedding generation: a small trait seam plus the fastembed-backed
//! provider used in production.
//!
//! fastembed's ONNX runtime is synchronous, so embedding runs on
//! `tokio::task::spawn_blocking`, the same bridge used to call into DuckDB
//! elsewhere in this workspace.

use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use tracing::{debug, info};

use crate::cache::EmbeddingCache;
use crate::error::EmbeddingError;

/// The vector width every embedding in this workspace is expected to have.
pub const EXPECTED_DIM: usize = 768;

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".patent-search")
        .join("cache")
        .join("fastembed")
}

/// A fastembed-backed provider using `BGEBaseENV15` (768-dim), with a
/// content-addressed disk cache in front of the model so re-embedding
/// already-seen text is a cache hit.
pub struct FastEmbedProvider {
    model: Mutex<TextEmbedding>,
    cache: EmbeddingCache,
    model_name: &'static str,
}

impl FastEmbedProvider {
    /// Load the model into a fresh cache directory under the user's home.
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::with_cache_dir(default_cache_dir())
    }

    pub fn with_cache_dir(cache_root: PathBuf) -> Result<Self, EmbeddingError> {
        let opts = TextInitOptions::new(EmbeddingModel::BGEBaseENV15)
            .with_cache_dir(cache_root.join("model"));
        let model = TextEmbedding::try_new(opts)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        info!(model = "BGEBaseENV15", "embedding model loaded");
        Ok(Self {
            model: Mutex::new(model),
            cache: EmbeddingCache::new(cache_root.join("vectors")),
            model_name: "BGEBaseENV15",
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut cached: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut misses: Vec<String> = Vec::new();
        let mut miss_positions: Vec<usize> = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let hit = self.cache.get(&EmbeddingCache::key_for(text))?;
            if hit.is_none() {
                misses.push(text.clone());
                miss_positions.push(i);
            }
            cached.push(hit);
        }
        debug!(total = texts.len(), misses = misses.len(), "embedding batch");

        if !misses.is_empty() {
            let model_name = self.model_name;
            let fresh = self.run_model(misses.clone()).await?;
            for (pos, vector) in miss_positions.iter().zip(fresh.iter()) {
                if vector.len() != EXPECTED_DIM {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: EXPECTED_DIM,
                        actual: vector.len(),
                        model: model_name.to_string(),
                    });
                }
                cached[*pos] = Some(vector.clone());
            }
            for (text, vector) in misses.iter().zip(fresh.iter()) {
                self.cache.put(text, vector)?;
            }
        }

        Ok(cached.into_iter().map(|v| v.expect("filled above")).collect())
    }
}

impl FastEmbedProvider {
    async fn run_model(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        // TextEmbedding isn't Send-safe to share across an await point while
        // locked, so the blocking call takes the lock inside the spawned task.
        let model = &self.model;
        tokio::task::block_in_place(|| {
            let mut guard = model.lock().expect("embedding model mutex poisoned");
            guard
                .embed(texts, None)
                .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct FakeProvider {
        dim: usize,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for FakeProvider {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let seed = t.len() as f32;
                    vec![seed; self.dim]
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn fake_provider_respects_dimension() {
        let provider = FakeProvider { dim: EXPECTED_DIM };
        let vectors = provider
            .embed(&["a".to_string(), "bb".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), EXPECTED_DIM);
        assert_eq!(vectors[1][0], 2.0);
    }
}
