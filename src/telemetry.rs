//! # Telemetry
//!
//! Global `tracing` subscriber setup.
//!
//! `RUST_LOG` takes precedence over `log.level` when set.

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Builds the event filter for `config`.
#[must_use]
pub fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Calling it again is a no-op; the first subscriber stays installed.
pub fn init(config: &LogConfig) {
    let filter = filter(config);

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(()) => tracing::debug!(format = ?config.format, "Tracing initialized"),
        Err(_) => tracing::debug!("Tracing already initialized"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = LogConfig::default();
        init(&config);
        init(&LogConfig {
            format: LogFormat::Json,
            ..config
        });
    }

    #[test]
    fn invalid_level_falls_back() {
        let config = LogConfig {
            level: "[[not a directive".to_string(),
            ..LogConfig::default()
        };
        // Falls back rather than failing.
        let _ = filter(&config);
    }
}
