//! Calendar HTTP Routes
//!
//! Endpoints for calendars, availability periods and reservations.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use super::extract::JsonBody;
use crate::calendar::{Calendar, CalendarResult, CalendarService, Period, Reservation};

// ==================
// Shared State
// ==================

/// Calendar state shared across handlers
pub struct CalendarState {
    pub service: Arc<CalendarService>,
}

impl CalendarState {
    pub fn new(service: Arc<CalendarService>) -> Self {
        Self { service }
    }
}

// ==================
// Calendar Routes
// ==================

/// Create calendar routes
pub fn calendar_routes(state: Arc<CalendarState>) -> Router {
    Router::new()
        // Calendars
        .route("/calendar", post(create_calendar_handler))
        .route("/calendar/", post(create_calendar_handler))
        .route(
            "/calendar/{id}",
            get(get_calendar_handler).put(update_calendar_handler),
        )
        // Availability periods
        .route(
            "/calendar/period/{id}",
            get(get_period_handler).post(set_period_handler),
        )
        // Reservations
        .route(
            "/calendar/reservation/{id}",
            get(get_reservation_handler).post(add_reservation_handler),
        )
        .route(
            "/calendar/reservation/cancel/{id}",
            delete(cancel_reservation_handler),
        )
        .with_state(state)
}

// ==================
// Calendar Handlers
// ==================

async fn create_calendar_handler(
    State(state): State<Arc<CalendarState>>,
    JsonBody(calendar): JsonBody<Calendar>,
) -> CalendarResult<StatusCode> {
    state.service.create_calendar(calendar)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_calendar_handler(
    State(state): State<Arc<CalendarState>>,
    Path(id): Path<String>,
    JsonBody(calendar): JsonBody<Calendar>,
) -> CalendarResult<Json<Calendar>> {
    let calendar = state.service.update_calendar(&id, calendar).await?;
    Ok(Json(calendar))
}

async fn get_calendar_handler(
    State(state): State<Arc<CalendarState>>,
    Path(id): Path<String>,
) -> CalendarResult<Json<Calendar>> {
    Ok(Json(state.service.get_calendar(&id).await?))
}

// ==================
// Period Handlers
// ==================

async fn set_period_handler(
    State(state): State<Arc<CalendarState>>,
    Path(calendar_id): Path<String>,
    JsonBody(period): JsonBody<Period>,
) -> CalendarResult<StatusCode> {
    state.service.set_available_period(&calendar_id, period)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_period_handler(
    State(state): State<Arc<CalendarState>>,
    Path(id): Path<String>,
) -> CalendarResult<Json<Period>> {
    Ok(Json(state.service.get_available_period(&id).await?))
}

// ==================
// Reservation Handlers
// ==================

async fn add_reservation_handler(
    State(state): State<Arc<CalendarState>>,
    Path(calendar_id): Path<String>,
    JsonBody(reservation): JsonBody<Reservation>,
) -> CalendarResult<StatusCode> {
    state.service.add_reservation(&calendar_id, reservation).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel_reservation_handler(
    State(state): State<Arc<CalendarState>>,
    Path(calendar_id): Path<String>,
    JsonBody(reservation): JsonBody<Reservation>,
) -> CalendarResult<StatusCode> {
    state
        .service
        .cancel_reservation(&calendar_id, &reservation)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_reservation_handler(
    State(state): State<Arc<CalendarState>>,
    Path(id): Path<String>,
) -> CalendarResult<Json<Reservation>> {
    Ok(Json(state.service.get_reservation(&id).await?))
}
