//! # Media Service
//!
//! Content-addressed uploads: the id of a blob is the SHA-256 of its bytes,
//! so identical content always lands under the same id.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::backend::BlobStore;
use super::errors::{MediaError, MediaResult};

/// Upload and download of media blobs
#[derive(Debug, Clone)]
pub struct MediaService {
    backend: Arc<dyn BlobStore>,
}

impl MediaService {
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self { backend }
    }

    /// Hex-encoded SHA-256 of `data`
    pub fn content_id(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn validate_id(id: &str) -> MediaResult<()> {
        let well_formed = id.len() == 64
            && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(())
        } else {
            Err(MediaError::InvalidId(id.to_string()))
        }
    }

    /// Store `data` and return its content id. Already stored content is not
    /// rewritten.
    pub fn upload(&self, data: &[u8]) -> MediaResult<String> {
        let id = Self::content_id(data);

        if self.backend.exists(&id)? {
            debug!(media_id = %id, "media already stored");
            return Ok(id);
        }

        self.backend.put(&id, data)?;
        info!(media_id = %id, size = data.len(), "media stored");
        Ok(id)
    }

    pub fn download(&self, id: &str) -> MediaResult<Vec<u8>> {
        Self::validate_id(id)?;
        self.backend.get(id)
    }
}
