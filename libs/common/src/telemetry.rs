//! Tracing setup shared by the client binaries

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Logs go to stderr
/// so command output on stdout stays machine-readable.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {}", e))
}
