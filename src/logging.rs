//! Tracing subscriber setup.
//!
//! The level filter comes from `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=virtupack=debug` to see every accepted configuration change.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogConfig;

/// Installs the global subscriber.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .init();
    }
}

/// Installs a verbose subscriber writing through the test harness.
///
/// Safe to call from several tests; only the first call installs it.
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
