//! Structured logging setup
//!
//! Plain text logs for development, JSON logs (`JSON_LOGS=true`) for
//! production. `RUST_LOG` overrides the configured level when set.

use anyhow::Result;
use resultwire_common::TelemetrySettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
pub fn init(settings: &TelemetrySettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&settings.log_level)?,
    };

    let subscriber = tracing_subscriber::registry().with(filter);

    if settings.json_logs {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    tracing::debug!(
        log_level = %settings.log_level,
        json_logs = settings.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

/// Parse filter directives such as `info,resultwire_gateway=debug`
pub fn parse_filter(directives: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::try_new(directives)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("info,resultwire_gateway=debug").is_ok());
        assert!(parse_filter("resultwire_gateway=loud").is_err());
    }

    #[test]
    fn test_init_only_once() {
        let settings = TelemetrySettings {
            log_level: "debug".to_string(),
            json_logs: false,
        };
        let _ = init(&settings);
        assert!(init(&settings).is_err());
    }
}
