//! Tracing setup for the suite runner

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize stdout logging
///
/// Controlled by `RUST_LOG`; defaults to INFO for this crate and WARN for
/// dependencies (headless_chrome is chatty at INFO).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("funda_smoke=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();
}
