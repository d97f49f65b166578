//! Configuration utilities for resultwire services

use serde::{de, Deserialize, Deserializer, Serialize};

/// Telemetry/observability settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub log_level: String,
    /// Enable JSON log format
    pub json_logs: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: env_or_default("RESULTWIRE_LOG_LEVEL", "info"),
            json_logs: std::env::var("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Load configuration from environment variables
pub fn load_from_env<T: for<'de> Deserialize<'de>>(prefix: &str) -> Result<T, config::ConfigError> {
    config::Config::builder()
        .add_source(
            config::Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// Get environment variable with default
pub fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a size string like "1GB", "512MB", "64KB" or a plain byte count
pub fn parse_size(s: &str) -> Option<usize> {
    let s = s.trim().to_uppercase();
    let (digits, multiplier) = if let Some(v) = s.strip_suffix("GB") {
        (v, 1024 * 1024 * 1024)
    } else if let Some(v) = s.strip_suffix("MB") {
        (v, 1024 * 1024)
    } else if let Some(v) = s.strip_suffix("KB") {
        (v, 1024)
    } else {
        (s.as_str(), 1)
    };
    digits.trim().parse::<usize>().ok()?.checked_mul(multiplier)
}

/// Deserialize a byte size given either as a number or as a size string
///
/// Use with `#[serde(deserialize_with = "deserialize_size")]`.
pub fn deserialize_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeValue {
        Bytes(u64),
        Text(String),
    }

    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(n) => usize::try_from(n)
            .map_err(|_| de::Error::custom(format!("size {} does not fit in usize", n))),
        SizeValue::Text(text) => parse_size(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid size '{}'", text))),
    }
}

/// Read a size from the environment ("64KB", "16MB", ...), with default
pub fn env_size_or_default(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_size(&v))
        .unwrap_or(default)
}
