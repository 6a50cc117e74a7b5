use tracing_subscriber::{fmt, EnvFilter};

/// Build the log filter: `RUST_LOG` wins, then `LOG_LEVEL`, then `default_level`.
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global fmt subscriber for the ingest binary.
///
/// A second call is a no-op, so tests and the binary can share it.
pub fn init_tracing(default_level: &str) {
    let _ = fmt()
        .with_env_filter(build_filter(default_level))
        .with_target(true)
        .try_init();
}
