//! Diagnostic tracing for the search tools.
//!
//! Reports (candidate lists, seeds) go to stdout. Tracing goes to stderr and
//! is controlled by `RUST_LOG`, e.g. `RUST_LOG=preimage=debug` to see the
//! size of every search level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Defaults to `warn` when `RUST_LOG` is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
