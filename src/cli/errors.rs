//! CLI-specific error types
//!
//! Every CLI error is fatal: `main` prints it and exits non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;
use crate::media::MediaError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Startup and command failures
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to render config: {0}")]
    Render(#[source] serde_json::Error),

    #[error("Failed to create tokio runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("Failed to open media root {}: {source}", path.display())]
    MediaRoot {
        path: PathBuf,
        #[source]
        source: MediaError,
    },

    #[error("Cache unavailable: {0}")]
    Cache(#[from] CacheError),

    #[error("HTTP server failed: {0}")]
    Server(#[source] io::Error),
}

impl CliError {
    /// Process exit code: 2 for configuration problems, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigRead { .. }
            | CliError::ConfigParse { .. }
            | CliError::InvalidConfig(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_config_read_keeps_source() {
        let err = CliError::ConfigRead {
            path: PathBuf::from("/etc/calendar.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };

        assert_eq!(
            err.to_string(),
            "Failed to read config /etc/calendar.json: no such file"
        );
        assert_eq!(err.source().unwrap().to_string(), "no such file");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_cache_error_converts() {
        let err: CliError = CacheError::Connection("refused".into()).into();

        assert!(matches!(err, CliError::Cache(_)));
        assert!(err.source().is_some());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_server_failure_exit_code() {
        let err = CliError::Server(io::Error::new(io::ErrorKind::AddrInUse, "port taken"));
        assert_eq!(err.to_string(), "HTTP server failed: port taken");
        assert_eq!(err.exit_code(), 1);
    }
}
