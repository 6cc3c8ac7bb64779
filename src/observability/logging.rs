use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over the configured filter. An unparsable fallback
/// degrades to "info".
pub fn resolve_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global fmt subscriber. Later calls are no-ops.
pub fn init_logging(fallback: &str) {
    let _ = fmt().with_env_filter(resolve_filter(fallback)).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging("calendar_backend=debug");
        init_logging("warn");
    }

    #[test]
    fn test_resolve_filter_accepts_directives() {
        if std::env::var("RUST_LOG").is_err() {
            let filter = resolve_filter("calendar_backend=debug,tower_http=info");
            assert!(filter.to_string().contains("calendar_backend=debug"));
        }
    }
}
