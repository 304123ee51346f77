//! Diagnostic logging.
//!
//! Progress and results go to stderr with `eprintln!`; `tracing` carries the
//! debug detail (commands run, requests sent) behind `--verbose`/`RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,readout=debug"
    } else {
        "warn"
    }
}

/// Install the global stderr subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
