//! # Blob Store Trait

use super::errors::MediaResult;

/// Backend trait for blob storage
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Write data under key
    fn put(&self, key: &str, data: &[u8]) -> MediaResult<()>;

    /// Read data stored under key
    fn get(&self, key: &str) -> MediaResult<Vec<u8>>;

    /// Check if key exists
    fn exists(&self, key: &str) -> MediaResult<bool>;
}
