//! Tracing initialization
//!
//! Diagnostics go to stderr so stdout stays reserved for command output.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "DOCKPROXY_LOG";

/// Initialize the tracing subscriber.
///
/// Reads `DOCKPROXY_LOG` for the filter (e.g. `DOCKPROXY_LOG=dockproxy=debug`)
/// and falls back to `dockproxy=warn`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("dockproxy=warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
