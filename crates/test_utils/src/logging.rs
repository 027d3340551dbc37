//! Test log subscriber
//!
//! Installs a `tracing` subscriber writing through the test harness so that
//! calculator logs show up for failing tests only. Honours `RUST_LOG`,
//! defaulting to `debug` for the provisioning crates.

use once_cell::sync::Lazy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("domain_provisioning=debug,core_kernel=debug"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Another harness may already have installed a global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_test_writer())
        .try_init();
});

/// Initializes test logging once per test binary
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}
