//! Logging setup.
//!
//! The library only emits `tracing` events; the binary installs a `fmt`
//! subscriber once at startup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber using `filter` as the `EnvFilter` directive.
///
/// An unparsable directive falls back to `info`. Calling this twice is
/// harmless: the second install is ignored.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
