//! CLI command implementations
//!
//! `serve` wires the store, cache, media backend and routers together and
//! runs until Ctrl+C or SIGTERM.

use std::path::Path;
use std::sync::Arc;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use crate::cache::{Cache, MemoryCache, RedisCache};
use crate::calendar::CalendarService;
use crate::document_store::MemoryDocumentStore;
use crate::http_server::{CalendarState, HttpServer, MediaState};
use crate::media::{LocalBackend, MediaService};
use crate::observability;

use super::args::Command;
use super::config::{CacheBackend, CacheConfig, Config};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Validate a configuration file and print the effective settings
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let rendered = serde_json::to_string_pretty(&config)
        .map_err(CliError::Render)?;
    println!("{}", rendered);
    Ok(())
}

/// Boot the service and serve HTTP until shutdown
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    observability::init_logging(&config.log_filter);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;

    rt.block_on(async {
        let server = build_server(&config).await?;
        server
            .start(shutdown_signal())
            .await
            .map_err(CliError::Server)
    })
}

/// Construct every backend from config and assemble the server
pub async fn build_server(config: &Config) -> CliResult<HttpServer> {
    let store = Arc::new(MemoryDocumentStore::new());
    let cache = build_cache(&config.cache).await?;

    let calendar = CalendarService::new(store, cache, config.cache.ttl());

    let backend =
        LocalBackend::open(config.media.root.clone()).map_err(|source| CliError::MediaRoot {
            path: config.media.root.clone(),
            source,
        })?;
    let media = MediaService::new(Arc::new(backend));

    info!(
        media_root = %config.media.root.display(),
        cache_enabled = config.cache.enabled,
        "backends initialised"
    );

    Ok(HttpServer::with_config(
        config.http.clone(),
        Arc::new(CalendarState::new(Arc::new(calendar))),
        Arc::new(MediaState::new(media, config.media.max_upload_bytes)),
    ))
}

async fn build_cache(config: &CacheConfig) -> CliResult<Option<Arc<dyn Cache>>> {
    if !config.enabled {
        return Ok(None);
    }

    let cache: Arc<dyn Cache> = match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new(config.max_capacity)),
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| CliError::InvalidConfig("cache.redis_url is required".into()))?;
            Arc::new(RedisCache::connect(url).await?)
        }
    };

    info!(backend = ?config.backend, ttl_secs = config.ttl_secs, "cache enabled");
    Ok(Some(cache))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_server_creates_media_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("blobs");

        let mut config = Config::default();
        config.media.root = root.clone();
        config.cache.enabled = true;

        let server = build_server(&config).await.unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_disabled_cache_builds_nothing() {
        let cache = build_cache(&CacheConfig::default()).await.unwrap();
        assert!(cache.is_none());
    }

    #[test]
    fn test_check_config_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, r#"{"cache": {"max_capacity": 0}}"#).unwrap();

        let err = check_config(&path).unwrap_err();
        assert!(matches!(&err, CliError::InvalidConfig(msg) if msg.contains("max_capacity")));
    }

    #[tokio::test]
    async fn test_media_root_failure_names_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let mut config = Config::default();
        config.media.root = blocker.join("blobs");

        let err = build_server(&config).await.unwrap_err();
        assert!(matches!(&err, CliError::MediaRoot { path, .. } if *path == config.media.root));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_cache_error() {
        let config = CacheConfig {
            enabled: true,
            backend: CacheBackend::Redis,
            redis_url: Some("not a redis url".into()),
            ..Default::default()
        };

        let err = build_cache(&config).await.unwrap_err();
        assert!(matches!(err, CliError::Cache(_)));
    }
}
