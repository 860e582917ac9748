//! Schema DDL and the VSS vector literal helper.

use duckdb::Connection;

use crate::error::DbError;

/// Dimension every chunk embedding and every query vector must have.
pub const EXPECTED_DIM: usize = 768;

const DDL: &str = r"
CREATE TABLE IF NOT EXISTS patents (
    publication_number TEXT PRIMARY KEY,
    grant_date TEXT,
    title TEXT,
    abstract TEXT,
    raw_json JSON
);

CREATE TABLE IF NOT EXISTS patent_cpc (
    publication_number TEXT NOT NULL,
    cpc_code TEXT NOT NULL,
    UNIQUE (publication_number, cpc_code)
);

CREATE TABLE IF NOT EXISTS patent_citations (
    publication_number TEXT NOT NULL,
    cited_publication_number TEXT NOT NULL,
    UNIQUE (publication_number, cited_publication_number)
);

CREATE TABLE IF NOT EXISTS chunks (
    chunk_id TEXT PRIMARY KEY,
    publication_number TEXT NOT NULL,
    section_type TEXT NOT NULL,
    claim_num TEXT,
    para_id TEXT,
    is_dependent BOOLEAN,
    text TEXT NOT NULL,
    text_hash TEXT NOT NULL,
    metadata JSON,
    embedding FLOAT[768]
);

CREATE TABLE IF NOT EXISTS ingestion_state (
    source TEXT PRIMARY KEY,
    last_week TEXT,
    updated_at TIMESTAMP
);
";

/// Install/load the VSS extension and create every table if absent.
/// Idempotent — safe to call on every process start.
pub fn ensure_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch("INSTALL vss; LOAD vss;")?;
    conn.execute_batch(DDL)?;
    Ok(())
}

/// Best-effort HNSW index creation on `chunks.embedding`. Call once most
/// chunks have been embedded; a column that's still mostly NULL is not worth
/// indexing. Failure is non-fatal — the store falls back to a sequential
/// `array_cosine_distance` scan.
pub fn ensure_vector_index(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_chunks_embedding ON chunks USING HNSW (embedding) WITH (metric = 'cosine')",
    )?;
    Ok(())
}

/// Format a vector as a DuckDB array literal (`[0.1, 0.2, ...]`), the form
/// the VSS extension expects when cast to `FLOAT[N]`.
#[must_use]
pub fn vec_to_sql(v: &[f32]) -> String {
    format!(
        "[{}]",
        v.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )
}
