//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::calendar_routes::{calendar_routes, CalendarState};
use super::config::HttpServerConfig;
use super::entity_routes::entity_routes;
use super::media_routes::{media_routes, MediaState};
use super::observability_routes::health_routes;

/// HTTP server for the calendar backend
#[derive(Debug)]
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over already constructed service states
    pub fn with_config(
        config: HttpServerConfig,
        calendar_state: Arc<CalendarState>,
        media_state: Arc<MediaState>,
    ) -> Self {
        let router = build_router(&config, calendar_state, media_state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "calendar backend listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("server stopped");
        Ok(())
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the combined router with all endpoints
pub fn build_router(
    config: &HttpServerConfig,
    calendar_state: Arc<CalendarState>,
    media_state: Arc<MediaState>,
) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(calendar_routes(calendar_state.clone()))
        .merge(entity_routes(calendar_state))
        .merge(media_routes(media_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}
