//! # HTTP Server Module
//!
//! Axum routers for the calendar backend.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/calendar/*` - Calendars, availability periods and reservations
//! - `/entity/*` - Owner entities
//! - `/media/*` - Content-addressed media upload and download

pub mod calendar_routes;
pub mod config;
pub mod entity_routes;
pub mod extract;
pub mod media_routes;
pub mod observability_routes;
pub mod server;

pub use calendar_routes::CalendarState;
pub use config::HttpServerConfig;
pub use extract::JsonBody;
pub use media_routes::MediaState;
pub use server::{build_router, HttpServer};
