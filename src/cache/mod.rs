//! # Cache Layer
//!
//! Optional key/value cache placed in front of the document store. Backends
//! store opaque strings with a per-entry TTL; `CachedRepository` layers the
//! read-through behaviour on top for any stored document type.

mod errors;
mod memory;
mod redis_cache;
mod repository;

use std::time::Duration;

use async_trait::async_trait;

pub use self::errors::{CacheError, CacheResult};
pub use self::memory::MemoryCache;
pub use self::redis_cache::RedisCache;
pub use self::repository::CachedRepository;

/// Backend trait for the cache
#[async_trait]
pub trait Cache: Send + Sync + std::fmt::Debug {
    /// Fetch a value, `None` on miss or expiry
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value that expires after `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Remove a value if present
    async fn delete(&self, key: &str) -> CacheResult<()>;
}
