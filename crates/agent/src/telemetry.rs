//! Tracing setup

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`; without it, advisor crates log at debug and
/// everything else at info. Safe to call more than once (later calls are
/// no-ops), so tests can share it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,car_advisor=debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
