//! Diagnostic logging setup
//!
//! Diagnostics go to stderr only; stdout carries command output and `--json`.

use tracing_subscriber::filter::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Build an `EnvFilter` from CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > `warn`
pub fn env_filter(quiet: bool, verbose: u8) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(quiet: bool, verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(quiet, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    tracing::debug!("logging initialized");
}
