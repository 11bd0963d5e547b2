//! Tracing subscriber setup. Logs go to stderr so CLI output on stdout stays
//! machine-readable.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "fide_lookup=info";

/// Install the global subscriber, honouring `RUST_LOG` when set. Safe to call
/// more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
