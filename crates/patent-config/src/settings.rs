//! The process-wide configuration record, loaded once from the environment
//! at startup and passed explicitly to each component from then on.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::Env;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_opensearch_index() -> String {
    "chunks".to_string()
}

const fn default_embed_batch_size() -> usize {
    500
}

/// Immutable, process-wide configuration. Construct once via [`Config::load`]
/// and pass by reference; there is no process-wide singleton.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Relational store connection string. Named `POSTGRES_DSN` for parity
    /// with the deployments this engine has run alongside; in this
    /// implementation it is the DuckDB database file path.
    #[serde(default)]
    pub postgres_dsn: String,

    #[serde(default)]
    pub opensearch_url: String,

    #[serde(default = "default_opensearch_index")]
    pub opensearch_index: String,

    #[serde(default = "default_data_root")]
    pub data_root: String,

    #[serde(default)]
    pub embedding_model: String,

    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,

    #[serde(default)]
    pub odp_bulk_search_url: String,

    #[serde(default)]
    pub odp_ptgrxml_dataset_page_url: String,

    #[serde(default)]
    pub odp_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            postgres_dsn: String::new(),
            opensearch_url: String::new(),
            opensearch_index: default_opensearch_index(),
            data_root: default_data_root(),
            embedding_model: String::new(),
            embed_batch_size: default_embed_batch_size(),
            odp_bulk_search_url: String::new(),
            odp_ptgrxml_dataset_page_url: String::new(),
            odp_api_key: None,
        }
    }
}

impl Config {
    /// Load from the process environment, falling back to built-in defaults
    /// for fields the environment doesn't set. Env var names carry no
    /// prefix (`DATA_ROOT`, not `PATENT_DATA_ROOT`).
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Figment::from(figment::providers::Serialized::defaults(Config::default()))
            .merge(Env::raw())
            .extract()
            .map_err(ConfigError::from)
    }

    #[must_use]
    pub fn data_root(&self) -> &Path {
        Path::new(&self.data_root)
    }

    #[must_use]
    pub fn raw_root(&self) -> PathBuf {
        self.data_root().join("raw").join("ptgrxml")
    }

    #[must_use]
    pub fn parsed_root(&self) -> PathBuf {
        self.data_root().join("parsed").join("patents")
    }

    #[must_use]
    pub fn derived_root(&self) -> PathBuf {
        self.data_root().join("derived")
    }

    #[must_use]
    pub fn embedding_cache_dir(&self) -> PathBuf {
        self.derived_root().join("embedding_cache")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_fill_in_unset_fields() {
        let config = Config::default();
        assert_eq!(config.data_root, "./data");
        assert_eq!(config.opensearch_index, "chunks");
        assert_eq!(config.embed_batch_size, 500);
        assert!(config.odp_api_key.is_none());
    }

    #[test]
    fn derived_paths_nest_under_data_root() {
        let config = Config {
            data_root: "/tmp/patents".to_string(),
            ..Config::default()
        };
        assert_eq!(config.raw_root(), PathBuf::from("/tmp/patents/raw/ptgrxml"));
        assert_eq!(config.parsed_root(), PathBuf::from("/tmp/patents/parsed/patents"));
        assert_eq!(config.derived_root(), PathBuf::from("/tmp/patents/derived"));
    }

    #[test]
    fn load_reads_raw_env_vars_without_a_prefix() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATA_ROOT", "/tmp/patent-config-test");
            jail.set_env("OPENSEARCH_URL", "http://localhost:9200");

            let config: Config = Figment::from(figment::providers::Serialized::defaults(Config::default()))
                .merge(Env::raw())
                .extract()?;

            assert_eq!(config.data_root, "/tmp/patent-config-test");
            assert_eq!(config.opensearch_url, "http://localhost:9200");
            Ok(())
        });
    }
}
