//! Tracing subscriber setup for binaries embedding the bridge.

use anyhow::anyhow;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, at `info` by default.
pub fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
