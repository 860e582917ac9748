//! Wires configuration into the concrete backends the rest of the CLI
//! operates on: the relational store, lexical index, embedding provider,
//! and weekly-archive downloader.

use anyhow::Context;
use patent_config::Config;
use patent_db::RelationalStore;
use patent_download::PtgrxmlDownloader;
use patent_embed::FastEmbedProvider;
use patent_index::OpenSearchIndex;

pub struct App {
    pub config: Config,
    pub store: RelationalStore,
    pub index: OpenSearchIndex,
    pub embedder: FastEmbedProvider,
    pub downloader: PtgrxmlDownloader,
}

impl App {
    pub fn init() -> anyhow::Result<Self> {
        let config = Config::load().context("failed to load configuration from the environment")?;

        std::fs::create_dir_all(config.data_root())
            .with_context(|| format!("failed to create data root at {}", config.data_root().display()))?;

        let db_path = if config.postgres_dsn.is_empty() {
            config.data_root().join("patents.duckdb")
        } else {
            std::path::PathBuf::from(&config.postgres_dsn)
        };
        let store = RelationalStore::open(&db_path)
            .with_context(|| format!("failed to open relational store at {}", db_path.display()))?;

        let index = OpenSearchIndex::new(
            reqwest::Client::new(),
            config.opensearch_url.clone(),
            config.opensearch_index.clone(),
        );

        let embedder = FastEmbedProvider::with_cache_dir(config.embedding_cache_dir())
            .context("failed to load the embedding model")?;

        let downloader = PtgrxmlDownloader::new(
            config.data_root().to_path_buf(),
            config.odp_ptgrxml_dataset_page_url.clone(),
            if config.odp_bulk_search_url.is_empty() {
                None
            } else {
                Some(config.odp_bulk_search_url.clone())
            },
            config.odp_api_key.clone(),
        );

        Ok(Self {
            config,
            store,
            index,
            embedder,
            downloader,
        })
    }
}
