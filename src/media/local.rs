//! # Local Filesystem Backend

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use super::backend::BlobStore;
use super::errors::{MediaError, MediaResult};

/// Blobs as flat files under one root directory
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if needed
    pub fn open(root: PathBuf) -> MediaResult<Self> {
        fs::create_dir_all(&root).map_err(|e| MediaError::IoError(e.to_string()))?;
        Ok(Self::new(root))
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl BlobStore for LocalBackend {
    fn put(&self, key: &str, data: &[u8]) -> MediaResult<()> {
        let full_path = self.full_path(key);
        let dir = full_path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(dir).map_err(|e| MediaError::IoError(e.to_string()))?;

        // Each writer stages into its own file so concurrent puts of one key
        // never share a path; readers never see a partial blob.
        let mut staging = NamedTempFile::new_in(dir).map_err(|e| MediaError::IoError(e.to_string()))?;
        staging
            .write_all(data)
            .map_err(|e| MediaError::IoError(e.to_string()))?;

        match staging.persist(&full_path) {
            Ok(_) => Ok(()),
            // Keys are content hashes: whoever got there first wrote the same bytes
            Err(_) if full_path.is_file() => Ok(()),
            Err(e) => Err(MediaError::IoError(e.error.to_string())),
        }
    }

    fn get(&self, key: &str) -> MediaResult<Vec<u8>> {
        fs::read(self.full_path(key)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MediaError::NotFound(key.to_string())
            } else {
                MediaError::IoError(e.to_string())
            }
        })
    }

    fn exists(&self, key: &str) -> MediaResult<bool> {
        Ok(self.full_path(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_get() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.put("blob", b"hello").unwrap();
        assert_eq!(backend.get("blob").unwrap(), b"hello");
        assert!(backend.exists("blob").unwrap());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_open_creates_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("media").join("images");

        let backend = LocalBackend::open(root.clone()).unwrap();
        assert!(root.is_dir());
        assert!(!backend.exists("anything").unwrap());
    }

    #[test]
    fn test_not_found() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        let result = backend.get("missing");
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }

    #[test]
    fn test_concurrent_puts_of_same_key() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());
        let data = vec![42u8; 1024 * 1024];

        for _ in 0..20 {
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..8)
                    .map(|_| scope.spawn(|| backend.put("blob", &data)))
                    .collect();
                for handle in handles {
                    handle.join().unwrap().unwrap();
                }
            });
        }

        assert_eq!(backend.get("blob").unwrap(), data);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
