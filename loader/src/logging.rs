//! Log output for the loader binary.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter on stderr which also receives those
//! records.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a log filter such as `sqlj_loader=debug`.
pub const LOG_ENV: &str = "SQLJ_LOADER_LOG";

/// Filter directive used when [`LOG_ENV`] is unset.
#[must_use]
pub const fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter from [`LOG_ENV`], falling back to the CLI verbosity.
#[must_use]
pub fn filter(verbosity: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)))
}

/// Install the stderr subscriber. Later calls have no effect.
pub fn init(verbosity: u8, quiet: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    if tracing_subscriber::registry()
        .with(filter(verbosity, quiet))
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        log::debug!("log subscriber already installed");
    }
}
