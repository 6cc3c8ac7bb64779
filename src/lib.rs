//! calendar-backend - Calendars, availability periods and reservations over HTTP
//!
//! Layers, bottom up:
//! - `document_store`: keyed JSON documents per table with equality filters
//! - `cache`: read-through cache in front of the store (moka or redis)
//! - `calendar`: ownership, availability windows and reservation matching
//! - `media`: content-addressed blob upload/download
//! - `http_server`: axum routers
//! - `cli`: configuration and bootstrap

pub mod cache;
pub mod calendar;
pub mod cli;
pub mod document_store;
pub mod http_server;
pub mod media;
pub mod observability;
