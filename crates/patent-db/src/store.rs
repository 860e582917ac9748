//! `RelationalStore` — the DuckDB-backed patent/chunk store.
//!
//! DuckDB's driver is synchronous; every operation below hands the
//! connection to a blocking worker via [`tokio::task::spawn_blocking`] so
//! callers can `.await` it like any other I/O.

use std::path::Path;
use std::sync::{Arc, Mutex};

use duckdb::{params, params_from_iter, Connection};
use patent_core::chunk::EvidenceChunk;
use patent_core::record::PatentRecord;

use crate::error::DbError;
use crate::schema::{ensure_schema, ensure_vector_index, vec_to_sql, EXPECTED_DIM};

/// One hit from [`RelationalStore::vector_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub chunk_id: String,
    pub publication_number: String,
    pub section_type: String,
    pub text: String,
    pub score: f64,
}

#[derive(Clone)]
pub struct RelationalStore {
    conn: Arc<Mutex<Connection>>,
}

impl RelationalStore {
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            f(&guard)
        })
        .await?
    }

    /// Insert or overwrite one patent row and fully replace its CPC and
    /// citation association rows.
    pub async fn upsert_patent(&self, patent: PatentRecord) -> Result<(), DbError> {
        self.with_conn(move |conn| {
            let raw_json = serde_json::to_string(&patent.raw)?;
            conn.execute(
                "INSERT INTO patents (publication_number, grant_date, title, abstract, raw_json)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT (publication_number) DO UPDATE SET
                     grant_date = excluded.grant_date,
                     title = excluded.title,
                     abstract = excluded.abstract,
                     raw_json = excluded.raw_json",
                params![
                    patent.publication_number,
                    patent.grant_date,
                    patent.title,
                    patent.abstract_text,
                    raw_json,
                ],
            )?;

            conn.execute(
                "DELETE FROM patent_cpc WHERE publication_number = ?",
                params![patent.publication_number],
            )?;
            let mut cpc_codes = patent.cpc_codes.clone();
            cpc_codes.sort();
            cpc_codes.dedup();
            for code in &cpc_codes {
                conn.execute(
                    "INSERT INTO patent_cpc (publication_number, cpc_code) VALUES (?, ?)
                     ON CONFLICT (publication_number, cpc_code) DO NOTHING",
                    params![patent.publication_number, code],
                )?;
            }

            conn.execute(
                "DELETE FROM patent_citations WHERE publication_number = ?",
                params![patent.publication_number],
            )?;
            for cited in &patent.citations {
                conn.execute(
                    "INSERT INTO patent_citations (publication_number, cited_publication_number) VALUES (?, ?)
                     ON CONFLICT (publication_number, cited_publication_number) DO NOTHING",
                    params![patent.publication_number, cited],
                )?;
            }

            Ok(())
        })
        .await
    }

    /// Per-chunk upsert by `chunk_id`. The `embedding` column is never
    /// touched here — only [`Self::update_embedding`] writes it.
    pub async fn upsert_chunks(&self, chunks: Vec<EvidenceChunk>) -> Result<(), DbError> {
        self.with_conn(move |conn| {
            for chunk in &chunks {
                let metadata_json = serde_json::to_string(&chunk.metadata)?;
                conn.execute(
                    "INSERT INTO chunks
                         (chunk_id, publication_number, section_type, claim_num, para_id,
                          is_dependent, text, text_hash, metadata)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                     ON CONFLICT (chunk_id) DO UPDATE SET
                         section_type = excluded.section_type,
                         claim_num = excluded.claim_num,
                         para_id = excluded.para_id,
                         is_dependent = excluded.is_dependent,
                         text = excluded.text,
                         text_hash = excluded.text_hash,
                         metadata = excluded.metadata",
                    params![
                        chunk.chunk_id,
                        chunk.publication_number,
                        chunk.section_type.as_str(),
                        chunk.claim_num,
                        chunk.para_id,
                        chunk.is_dependent,
                        chunk.text,
                        chunk.text_hash,
                        metadata_json,
                    ],
                )?;
            }
            Ok(())
        })
        .await
    }

    pub async fn update_embedding(&self, chunk_id: String, vector: Vec<f32>) -> Result<(), DbError> {
        self.update_embeddings(vec![(chunk_id, vector)]).await
    }

    pub async fn update_embeddings(&self, pairs: Vec<(String, Vec<f32>)>) -> Result<(), DbError> {
        self.with_conn(move |conn| {
            for (chunk_id, vector) in &pairs {
                debug_assert_eq!(vector.len(), EXPECTED_DIM);
                let literal = vec_to_sql(vector);
                conn.execute(
                    &format!("UPDATE chunks SET embedding = {literal}::FLOAT[{EXPECTED_DIM}] WHERE chunk_id = ?"),
                    params![chunk_id],
                )?;
            }
            Ok(())
        })
        .await
    }

    /// Up to `limit` `(chunk_id, text)` pairs with a null embedding. No
    /// ordering guarantee.
    pub async fn fetch_chunks_missing_embeddings(
        &self,
        limit: usize,
    ) -> Result<Vec<(String, String)>, DbError> {
        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare("SELECT chunk_id, text FROM chunks WHERE embedding IS NULL LIMIT ?")?;
            let rows = stmt
                .query_map(params![limit as i64], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Top-`k` chunks by cosine similarity among chunks with a non-null
    /// embedding.
    pub async fn vector_search(&self, query_vector: Vec<f32>, topk: usize) -> Result<Vec<VectorHit>, DbError> {
        self.with_conn(move |conn| {
            let literal = vec_to_sql(&query_vector);
            let sql = format!(
                "SELECT chunk_id, publication_number, section_type, text,
                        1 - array_cosine_distance(embedding, {literal}::FLOAT[{EXPECTED_DIM}]) AS score
                 FROM chunks
                 WHERE embedding IS NOT NULL
                 ORDER BY score DESC
                 LIMIT ?"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![topk as i64], |row| {
                    Ok(VectorHit {
                        chunk_id: row.get(0)?,
                        publication_number: row.get(1)?,
                        section_type: row.get(2)?,
                        text: row.get(3)?,
                        score: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Best-effort HNSW index build over `chunks.embedding`; see
    /// [`ensure_vector_index`].
    pub async fn build_vector_index(&self) -> Result<(), DbError> {
        self.with_conn(|conn| ensure_vector_index(conn)).await
    }

    /// Union of publications cited by any of `publications`, and
    /// publications sharing at least one CPC code with any of them,
    /// excluding the input set itself. Bounded by `limit` per branch.
    pub async fn graph_neighbors(
        &self,
        publications: Vec<String>,
        limit: usize,
    ) -> Result<Vec<String>, DbError> {
        if publications.is_empty() {
            return Ok(Vec::new());
        }
        self.with_conn(move |conn| {
            let placeholders = vec!["?"; publications.len()].join(", ");

            let cited_sql = format!(
                "SELECT DISTINCT cited_publication_number FROM patent_citations
                 WHERE publication_number IN ({placeholders}) LIMIT ?"
            );
            let mut stmt = conn.prepare(&cited_sql)?;
            let limit_i64 = limit as i64;
            let mut limit_params: Vec<&dyn duckdb::ToSql> =
                publications.iter().map(|p| p as &dyn duckdb::ToSql).collect();
            limit_params.push(&limit_i64);
            let cited: Vec<String> = stmt
                .query_map(params_from_iter(limit_params), |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;

            let cpc_sql = format!(
                "SELECT DISTINCT b.publication_number
                 FROM patent_cpc a
                 JOIN patent_cpc b ON a.cpc_code = b.cpc_code
                 WHERE a.publication_number IN ({placeholders})
                   AND b.publication_number NOT IN ({placeholders})
                 LIMIT ?"
            );
            let mut stmt = conn.prepare(&cpc_sql)?;
            let mut cpc_params: Vec<&dyn duckdb::ToSql> =
                publications.iter().map(|p| p as &dyn duckdb::ToSql).collect();
            cpc_params.extend(publications.iter().map(|p| p as &dyn duckdb::ToSql));
            cpc_params.push(&limit_i64);
            let cpc_neighbors: Vec<String> = stmt
                .query_map(params_from_iter(cpc_params), |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;

            let mut seen: std::collections::HashSet<String> = publications.iter().cloned().collect();
            let mut out = Vec::new();
            for pub_num in cited.into_iter().chain(cpc_neighbors) {
                if seen.insert(pub_num.clone()) {
                    out.push(pub_num);
                }
            }
            Ok(out)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use patent_core::chunk::SectionType;
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture_patent(pub_num: &str, cpc: &[&str], citations: &[&str]) -> PatentRecord {
        PatentRecord {
            publication_number: pub_num.to_string(),
            grant_date: Some("20240213".to_string()),
            title: "A Widget".to_string(),
            abstract_text: "An abstract.".to_string(),
            summary_paragraphs: Vec::new(),
            description_paragraphs: Vec::new(),
            claims: Vec::new(),
            cpc_codes: cpc.iter().map(ToString::to_string).collect(),
            citations: citations.iter().map(ToString::to_string).collect(),
            raw: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn upsert_patent_replaces_associations() {
        let store = RelationalStore::open_in_memory().unwrap();
        store
            .upsert_patent(fixture_patent("US1", &["G06F17/30"], &["US2"]))
            .await
            .unwrap();
        store
            .upsert_patent(fixture_patent("US1", &["H04L12/58"], &[]))
            .await
            .unwrap();

        let neighbors = store.graph_neighbors(vec!["US1".to_string()], 10).await.unwrap();
        assert!(neighbors.is_empty(), "US2 citation should have been replaced away");
    }

    #[tokio::test]
    async fn upsert_chunks_leaves_embedding_untouched() {
        let store = RelationalStore::open_in_memory().unwrap();
        store.upsert_patent(fixture_patent("US1", &[], &[])).await.unwrap();
        let chunk = EvidenceChunk::new("US1", SectionType::Abstract, "abstract", "An abstract.");
        store.upsert_chunks(vec![chunk.clone()]).await.unwrap();
        store
            .update_embedding(chunk.chunk_id.clone(), vec![0.1; EXPECTED_DIM])
            .await
            .unwrap();
        store.upsert_chunks(vec![chunk.clone()]).await.unwrap();

        let missing = store.fetch_chunks_missing_embeddings(10).await.unwrap();
        assert!(missing.is_empty(), "re-upsert must not null out the embedding");
    }

    #[tokio::test]
    async fn vector_search_orders_by_similarity() {
        let store = RelationalStore::open_in_memory().unwrap();
        store.upsert_patent(fixture_patent("US1", &[], &[])).await.unwrap();
        let near = EvidenceChunk::new("US1", SectionType::Abstract, "abstract", "near");
        let far = EvidenceChunk::new("US1", SectionType::Claim, "1", "far");
        store
            .upsert_chunks(vec![near.clone(), far.clone()])
            .await
            .unwrap();

        let mut near_vec = vec![0.0f32; EXPECTED_DIM];
        near_vec[0] = 1.0;
        let mut far_vec = vec![0.0f32; EXPECTED_DIM];
        far_vec[1] = 1.0;
        store
            .update_embeddings(vec![(near.chunk_id.clone(), near_vec.clone()), (far.chunk_id.clone(), far_vec)])
            .await
            .unwrap();

        let hits = store.vector_search(near_vec, 10).await.unwrap();
        assert_eq!(hits[0].chunk_id, near.chunk_id);
    }

    #[tokio::test]
    async fn graph_neighbors_unions_citations_and_shared_cpc() {
        let store = RelationalStore::open_in_memory().unwrap();
        store.upsert_patent(fixture_patent("US1", &["G06F17/30"], &["US2"])).await.unwrap();
        store.upsert_patent(fixture_patent("US3", &["G06F17/30"], &[])).await.unwrap();

        let mut neighbors = store.graph_neighbors(vec!["US1".to_string()], 10).await.unwrap();
        neighbors.sort();
        assert_eq!(neighbors, vec!["US2".to_string(), "US3".to_string()]);
    }
}
