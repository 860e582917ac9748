//! The week-by-week ingest orchestrator: download, parse, filter, chunk,
//! persist, and the trailing embedding backfill.

use std::io::Read;

use patent_config::Config;
use patent_core::chunk::EvidenceChunk;
use patent_db::RelationalStore;
use patent_download::{DownloadError, PtgrxmlDownloader};
use patent_embed::EmbeddingProvider;
use patent_index::LexicalIndex;
use tracing::{info, warn};

use crate::error::IngestError;

/// Chunks to pull per `fetch_chunks_missing_embeddings` round during backfill.
const EMBEDDING_BACKFILL_BATCH: usize = 500;

#[allow(clippy::too_many_arguments)]
pub async fn run_ingest(
    downloader: &PtgrxmlDownloader,
    store: &RelationalStore,
    index: &dyn LexicalIndex,
    embedder: &dyn EmbeddingProvider,
    config: &Config,
    weeks: usize,
    cpc_prefix: &str,
    since_last: bool,
) -> Result<(), IngestError> {
    std::fs::create_dir_all(config.parsed_root()).map_err(|source| IngestError::Io {
        path: config.parsed_root().display().to_string(),
        source,
    })?;
    let chunks_root = config.derived_root().join("chunks");
    std::fs::create_dir_all(&chunks_root).map_err(|source| IngestError::Io {
        path: chunks_root.display().to_string(),
        source,
    })?;

    index.ensure_index().await?;

    let mut to_process = downloader.select_weeks(weeks, since_last).await?;
    if to_process.is_empty() {
        info!("no unprocessed weeks found");
        return Ok(());
    }
    to_process.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (week, url) in to_process {
        match ingest_week(downloader, store, index, config, &week, &url, cpc_prefix).await {
            Ok(()) => {}
            Err(IngestError::Download(DownloadError::NotFound { week })) => {
                warn!(week, "week archive not found, skipping without marking processed");
            }
            Err(error) => return Err(error),
        }
    }

    backfill_embeddings(store, embedder).await
}

async fn ingest_week(
    downloader: &PtgrxmlDownloader,
    store: &RelationalStore,
    index: &dyn LexicalIndex,
    config: &Config,
    week: &str,
    url: &str,
    cpc_prefix: &str,
) -> Result<(), IngestError> {
    let archive_path = downloader.download_week(week, url).await?;

    let file = std::fs::File::open(&archive_path).map_err(|source| IngestError::Io {
        path: archive_path.display().to_string(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|source| IngestError::Zip {
        path: archive_path.display().to_string(),
        source,
    })?;

    let mut week_chunks: Vec<EvidenceChunk> = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|source| IngestError::Zip {
            path: archive_path.display().to_string(),
            source,
        })?;
        if !entry.name().ends_with(".xml") {
            continue;
        }
        let mut bytes = Vec::new();
        if let Err(source) = entry.read_to_end(&mut bytes) {
            warn!(member = entry.name(), %source, "failed to read zip member, skipping");
            continue;
        }
        drop(entry);

        let records = match patent_parser::parse_patent_xml(&bytes) {
            Ok(records) => records,
            Err(error) => {
                warn!(week, %error, "failed to parse zip member, skipping");
                continue;
            }
        };

        for patent in records {
            if !patent_parser::has_cpc_prefix(&patent, cpc_prefix) {
                continue;
            }

            let sidecar_path = config.parsed_root().join(format!("{}.json", patent.publication_number));
            let sidecar_json = serde_json::to_vec_pretty(&patent)?;
            std::fs::write(&sidecar_path, sidecar_json).map_err(|source| IngestError::Io {
                path: sidecar_path.display().to_string(),
                source,
            })?;

            store.upsert_patent(patent.clone()).await?;
            let chunks = patent_parser::build_chunks(&patent);
            store.upsert_chunks(chunks.clone()).await?;
            index.index_chunks(&chunks).await?;
            week_chunks.extend(chunks);
        }
    }

    let jsonl_path = config.derived_root().join("chunks").join(format!("ipg{week}.jsonl"));
    serde_jsonlines::write_json_lines(&jsonl_path, &week_chunks).map_err(|source| IngestError::Io {
        path: jsonl_path.display().to_string(),
        source,
    })?;

    downloader.mark_processed(week)?;
    info!(week, accepted = week_chunks.len(), "week ingested");
    Ok(())
}

async fn backfill_embeddings(
    store: &RelationalStore,
    embedder: &dyn EmbeddingProvider,
) -> Result<(), IngestError> {
    loop {
        let pending = store
            .fetch_chunks_missing_embeddings(EMBEDDING_BACKFILL_BATCH)
            .await?;
        if pending.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = pending.iter().map(|(_, text)| text.clone()).collect();
        let vectors = embedder.embed(&texts).await?;
        let pairs: Vec<(String, Vec<f32>)> = pending
            .into_iter()
            .zip(vectors)
            .map(|((chunk_id, _), vector)| (chunk_id, vector))
            .collect();
        let batch_len = pairs.len();
        store.update_embeddings(pairs).await?;
        info!(batch_len, "embedded a backfill batch");
    }
}
