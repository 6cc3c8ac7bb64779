//! Media HTTP Routes
//!
//! Raw byte upload and download of content-addressed blobs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::media::{MediaResult, MediaService};

// ==================
// Shared State
// ==================

/// Media state shared across handlers
pub struct MediaState {
    pub service: MediaService,
    pub max_upload_bytes: usize,
}

impl MediaState {
    pub fn new(service: MediaService, max_upload_bytes: usize) -> Self {
        Self {
            service,
            max_upload_bytes,
        }
    }
}

// ==================
// Media Routes
// ==================

/// Create media routes
pub fn media_routes(state: Arc<MediaState>) -> Router {
    let limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/media", post(upload_handler))
        .route("/media/", post(upload_handler))
        .route("/media/{id}", get(download_handler))
        .layer(limit)
        .with_state(state)
}

// ==================
// Media Handlers
// ==================

/// Returns the content id as plain text
async fn upload_handler(State(state): State<Arc<MediaState>>, body: Bytes) -> MediaResult<String> {
    let id = state.service.upload(&body)?;
    Ok(id)
}

async fn download_handler(
    State(state): State<Arc<MediaState>>,
    Path(id): Path<String>,
) -> MediaResult<impl IntoResponse> {
    let data = state.service.download(&id)?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data))
}
