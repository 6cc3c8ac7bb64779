//! Configuration file structure
//!
//! Every field is optional; a missing file section falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

use super::errors::{CliError, CliResult};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub media: MediaConfig,

    /// Tracing filter used when `RUST_LOG` is unset (default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Which cache implementation backs the read-through repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_cache_backend")]
    pub backend: CacheBackend,

    /// Required when `backend` is "redis" and the cache is enabled
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Entry bound for the in-process cache
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory holding content-addressed blobs
    #[serde(default = "default_media_root")]
    pub root: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_log_filter() -> String {
    "info".to_string()
}
fn default_cache_backend() -> CacheBackend {
    CacheBackend::Memory
}
fn default_ttl_secs() -> u64 {
    120
}
fn default_max_capacity() -> u64 {
    10_000
}
fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
} // 10MB

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            cache: CacheConfig::default(),
            media: MediaConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: default_cache_backend(),
            redis_url: None,
            ttl_secs: default_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config =
            serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.cache.ttl_secs == 0 {
            return Err(CliError::InvalidConfig("cache.ttl_secs must be > 0".into()));
        }

        if self.cache.max_capacity == 0 {
            return Err(CliError::InvalidConfig("cache.max_capacity must be > 0".into()));
        }

        if self.cache.enabled
            && self.cache.backend == CacheBackend::Redis
            && self.cache.redis_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(CliError::InvalidConfig(
                "cache.redis_url is required when the redis cache backend is enabled".into(),
            ));
        }

        if self.media.max_upload_bytes == 0 {
            return Err(CliError::InvalidConfig("media.max_upload_bytes must be > 0".into()));
        }

        Ok(())
    }
}
