//! Logging initialization for the captioner CLI.
//!
//! Built on the `tracing` subscriber stack. Logs go to stderr so stdout
//! stays clean for the generated caption.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `verbose` raises the default level from INFO to DEBUG; a `RUST_LOG`
/// environment variable overrides either. With `json_format` set, log
/// lines come out as structured JSON instead of the human-readable
/// format.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
