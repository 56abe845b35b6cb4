//! Tracing initialization. Logs go to stderr so stdout stays a clean JSON
//! document.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when the configured directive doesn't parse.
pub const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: `-v` flags win over the configured level.
pub fn filter_directive(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install a stderr fmt subscriber filtered by `directive`.
pub fn init(directive: &str) -> Result<()> {
    let (env_filter, rejected) = match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    if let Some(e) = rejected {
        tracing::warn!(directive, error = %e, "invalid log filter, using {}", DEFAULT_FILTER);
    }

    Ok(())
}
