//! Tracing setup
//!
//! Stdout carries the MCP protocol, so every log line goes to stderr.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Target used for fired reminder events
pub const REMINDER_TARGET: &str = "focus_mcp::reminders";

/// Install the global subscriber; verbosity comes from `RUST_LOG` (default `info`)
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to set global tracing subscriber: {}", e))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
