//! Logging setup for the binary.

use anyhow::{Context as _, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// The default level is `info`, or `debug` when `verbose` is set. `RUST_LOG`
/// overrides it. HTTP client internals stay at `warn`. Calling this twice is
/// an error.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = build_filter(verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

fn build_filter(verbose: bool) -> Result<EnvFilter> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?))
}
