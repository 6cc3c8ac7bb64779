//! Observability for the calendar backend
//!
//! Structured logging through `tracing`. Request spans come from the
//! `TraceLayer` installed on the HTTP router.

mod logging;

pub use logging::{init_logging, resolve_filter};
