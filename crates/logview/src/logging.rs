//! Tracing initialization for the logview binary.
//!
//! Diagnostics go to stderr so that stdout carries only rendered views.
//!
//! # Priority (highest to lowest)
//!
//! 1. `RUST_LOG` env var
//! 2. `--verbose` flag (debug)
//! 3. Configured `log_level`

use tracing_subscriber::EnvFilter;

/// Build the filter directive for the given flags and configured level.
pub fn filter_directive(verbose: bool, log_level: &str) -> String {
    if verbose {
        "debug".to_string()
    } else {
        log_level.to_lowercase()
    }
}

/// Initialize the global tracing subscriber. Call once, early in `main()`.
pub fn init(verbose: bool, log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = filter_directive(verbose, log_level);
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
