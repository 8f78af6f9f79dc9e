//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install the global JSON subscriber
///
/// `service.log_level` may be a bare level or a full filter directive;
/// anything unparsable falls back to `info`. Calling this twice is harmless.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = &config.service.log_level;

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?} ({}), using `info`", log_level, err);
        EnvFilter::new("info")
    });

    if tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
        return Ok(());
    }

    tracing::info!(
        service = %config.service.name,
        environment = ?config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}
