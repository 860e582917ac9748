use async_trait::async_trait;
use patent_core::chunk::EvidenceChunk;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::IndexError;
use crate::r#trait::LexicalIndex;
use crate::types::Bm25Hit;

/// A lexical index reached over an OpenSearch-compatible HTTP wire.
pub struct OpenSearchIndex {
    client: Client,
    base_url: String,
    index_name: String,
}

impl OpenSearchIndex {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            index_name: index_name.into(),
        }
    }

    fn doc_url(&self, chunk_id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index_name, chunk_id)
    }

    fn mapping(&self) -> Value {
        json!({
            "mappings": {
                "properties": {
                    "chunk_id": { "type": "keyword" },
                    "publication_number": { "type": "keyword" },
                    "section_type": { "type": "keyword" },
                    "text": { "type": "text" },
                }
            }
        })
    }

    async fn index_exists(&self) -> Result<bool, IndexError> {
        let url = format!("{}/{}", self.base_url, self.index_name);
        let resp = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(|source| IndexError::Http { url, source })?;
        Ok(resp.status() == StatusCode::OK)
    }
}

#[async_trait]
impl LexicalIndex for OpenSearchIndex {
    async fn ensure_index(&self) -> Result<(), IndexError> {
        if self.index_exists().await? {
            debug!(index = %self.index_name, "lexical index already exists");
            return Ok(());
        }
        let url = format!("{}/{}", self.base_url, self.index_name);
        let resp = self
            .client
            .put(&url)
            .json(&self.mapping())
            .send()
            .await
            .map_err(|source| IndexError::Http { url: url.clone(), source })?;
        if !resp.status().is_success() && resp.status() != StatusCode::BAD_REQUEST {
            let status = resp.status();
            return Err(IndexError::IndexCreation(format!(
                "{} returned {status}",
                self.index_name
            )));
        }
        info!(index = %self.index_name, "created lexical index");
        Ok(())
    }

    async fn index_chunks(&self, chunks: &[EvidenceChunk]) -> Result<(), IndexError> {
        for chunk in chunks {
            let url = self.doc_url(&chunk.chunk_id);
            let body = json!({
                "chunk_id": chunk.chunk_id,
                "publication_number": chunk.publication_number,
                "section_type": chunk.section_type.as_str(),
                "text": chunk.text,
            });
            self.client
                .put(&url)
                .query(&[("refresh", "false")])
                .json(&body)
                .send()
                .await
                .map_err(|source| IndexError::Http { url, source })?;
        }
        if !chunks.is_empty() {
            let url = format!("{}/{}/_refresh", self.base_url, self.index_name);
            self.client
                .post(&url)
                .send()
                .await
                .map_err(|source| IndexError::Http { url, source })?;
        }
        Ok(())
    }

    async fn bm25_search(&self, query: &str, topk: usize) -> Result<Vec<Bm25Hit>, IndexError> {
        let url = format!("{}/{}/_search", self.base_url, self.index_name);
        let body = json!({
            "size": topk,
            "query": { "match": { "text": query } },
            "highlight": {
                "fields": { "text": { "fragment_size": 160, "number_of_fragments": 2 } }
            }
        });
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| IndexError::Http { url: url.clone(), source })?;
        let payload: Value = resp
            .json()
            .await
            .map_err(|source| IndexError::Http { url, source })?;
        Ok(parse_search_response(&payload))
    }
}

/// Extract ordered hits from an OpenSearch `_search` response body.
fn parse_search_response(payload: &Value) -> Vec<Bm25Hit> {
    let hits = payload["hits"]["hits"].as_array().cloned().unwrap_or_default();
    let mut out = Vec::with_capacity(hits.len());
    for hit in hits {
        let source = &hit["_source"];
        let highlights = hit["highlight"]["text"]
            .as_array()
            .map(|frags| {
                frags
                    .iter()
                    .filter_map(|f| f.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        out.push(Bm25Hit {
            chunk_id: source["chunk_id"].as_str().unwrap_or_default().to_string(),
            publication_number: source["publication_number"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            section_type: source["section_type"].as_str().unwrap_or_default().to_string(),
            text: source["text"].as_str().unwrap_or_default().to_string(),
            score: hit["_score"].as_f64().unwrap_or(0.0) as f32,
            highlights,
        });
    }
    out
}
