//! Tracing subscriber for the client.
//!
//! Events go to stderr so stdout carries only the report. `RUST_LOG`, when
//! set and valid, takes precedence over the verbosity flag.

use tracing_subscriber::EnvFilter;

/// Default directive for a `-v` count.
#[must_use]
pub const fn directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Resolves the filter: `RUST_LOG` first, then the verbosity default.
#[must_use]
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(verbosity)))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("installing tracing subscriber: {err}"))
}
