//! # Media Storage
//!
//! Content-addressed blob storage for uploaded media.

mod backend;
mod errors;
mod local;
mod service;

pub use backend::BlobStore;
pub use errors::{MediaError, MediaResult};
pub use local::LocalBackend;
pub use service::MediaService;
