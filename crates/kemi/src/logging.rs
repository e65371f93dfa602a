// File: src/logging.rs
// Purpose: tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `KEMI_LOG=kemi_overlay=debug`
pub const LOG_ENV: &str = "KEMI_LOG";

/// Install a fmt subscriber filtered by `KEMI_LOG`, or by `default_filter`
/// when the variable is unset or invalid
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
