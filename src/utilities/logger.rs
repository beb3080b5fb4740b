//! Logging setup for binaries.
//!
//! The library itself only emits through the `log` facade; binaries call
//! [`init_logging`] once to route those records (and `tracing` events)
//! through a `tracing-subscriber` formatter.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,coda_affect=debug";

/// Install a global fmt subscriber filtered by `RUST_LOG` (or `default_filter`).
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
