//! Entity HTTP Routes
//!
//! Owner records referenced by calendars.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::calendar_routes::CalendarState;
use super::extract::JsonBody;
use crate::calendar::{CalendarResult, Entity};

/// Create entity routes
pub fn entity_routes(state: Arc<CalendarState>) -> Router {
    Router::new()
        .route("/entity", post(create_entity_handler))
        .route("/entity/", post(create_entity_handler))
        .route("/entity/{id}", get(get_entity_handler))
        .with_state(state)
}

async fn create_entity_handler(
    State(state): State<Arc<CalendarState>>,
    JsonBody(entity): JsonBody<Entity>,
) -> CalendarResult<Json<Entity>> {
    Ok(Json(state.service.create_entity(entity)?))
}

async fn get_entity_handler(
    State(state): State<Arc<CalendarState>>,
    Path(id): Path<String>,
) -> CalendarResult<Json<Entity>> {
    Ok(Json(state.service.get_entity(&id)?))
}
