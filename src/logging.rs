//! Diagnostic logging setup for the CLI
//!
//! Library code only emits `tracing` events; the binary decides where they
//! go. Events are written to stderr so command output stays clean.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "ICONCACHE_LOG";

/// Install the global subscriber.
///
/// `ICONCACHE_LOG` wins when set; otherwise `verbose` selects `debug` for
/// this crate and `warn` for everything else. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default = if verbose { "warn,iconcache=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
