//! # Read-Through Repository
//!
//! One implementation of the cache-then-store read path for every stored
//! document type. The cache is optional; with no cache attached every read
//! goes to the store.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::Cache;
use crate::document_store::{DocumentStore, StoreError, StoreResult, StoredDocument};

/// Read-through access to documents of type `T`
pub struct CachedRepository<T> {
    store: Arc<dyn DocumentStore>,
    cache: Option<Arc<dyn Cache>>,
    ttl: Duration,
    _document: PhantomData<fn() -> T>,
}

impl<T: StoredDocument> CachedRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Option<Arc<dyn Cache>>, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
            _document: PhantomData,
        }
    }

    /// Cache keys are namespaced by table so ids from different tables
    /// never collide.
    pub fn cache_key(id: &str) -> String {
        format!("{}:{}", T::TABLE, id)
    }

    /// Read a document by id, consulting the cache first.
    ///
    /// An undecodable or unreachable cache entry counts as a miss. On a
    /// store hit the cache is populated with the repository TTL, then the
    /// store is read again. If the document was deleted or replaced in the
    /// meantime, the fresh entry is evicted.
    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        let key = Self::cache_key(id);

        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                    Ok(document) => {
                        debug!(key = %key, "cache hit");
                        return Ok(Some(document));
                    }
                    Err(e) => warn!(key = %key, error = %e, "discarding undecodable cache entry"),
                },
                Ok(None) => debug!(key = %key, "cache miss"),
                Err(e) => warn!(key = %key, error = %e, "cache read failed, falling back to store"),
            }
        }

        let Some(raw) = self.store.get(T::TABLE, id)? else {
            return Ok(None);
        };
        let document: T = serde_json::from_value(raw.clone())
            .map_err(|e| StoreError::InvalidDocument(format!("{}/{}: {}", T::TABLE, id, e)))?;

        if self.cache.is_some() {
            self.populate(&key, &document).await;
            if self.store.get(T::TABLE, id)?.as_ref() != Some(&raw) {
                debug!(key = %key, "document changed while populating, evicting");
                self.evict(id).await;
            }
        }
        Ok(Some(document))
    }

    /// Drop any cached copy of `id`
    pub async fn evict(&self, id: &str) {
        let Some(cache) = &self.cache else {
            return;
        };
        let key = Self::cache_key(id);
        if let Err(e) = cache.delete(&key).await {
            warn!(key = %key, error = %e, "cache eviction failed");
        }
    }

    async fn populate(&self, key: &str, document: &T) {
        let Some(cache) = &self.cache else {
            return;
        };
        let raw = match serde_json::to_string(document) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to encode document for cache");
                return;
            }
        };
        if let Err(e) = cache.set(key, raw, self.ttl).await {
            warn!(key = %key, error = %e, "cache write failed");
        }
    }
}
