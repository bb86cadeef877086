//! Logging utilities
//!
//! Provides logging setup and configuration.

/// Install the `env_logger` backend (driven by `RUST_LOG`).
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}
