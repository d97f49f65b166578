//! JSON result encoding configuration
//!
//! All values can be overridden via environment variables for flexible deployment.

use resultwire_common::config::{deserialize_size, env_size_or_default, load_from_env};
use resultwire_common::Result;
use serde::Deserialize;
use tracing::{info, warn};

/// Environment prefix for [`JsonWireConfig::from_env`]
pub const ENV_PREFIX: &str = "RESULTWIRE_JSON";

/// Buffer sizing for JSON payloads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JsonWireConfig {
    /// Bytes reserved up front for each payload buffer
    #[serde(deserialize_with = "deserialize_size")]
    pub initial_buffer_bytes: usize,
    /// Hard ceiling on a single payload; exceeding it is a generation failure.
    /// Set to 0 for unlimited.
    #[serde(deserialize_with = "deserialize_size")]
    pub max_payload_bytes: usize,
}

impl Default for JsonWireConfig {
    fn default() -> Self {
        Self {
            initial_buffer_bytes: env_size_or_default(
                "RESULTWIRE_JSON_INITIAL_BUFFER_BYTES",
                64 * 1024, // 64KB
            ),
            max_payload_bytes: env_size_or_default("RESULTWIRE_JSON_MAX_PAYLOAD_BYTES", 0),
        }
    }
}

impl JsonWireConfig {
    /// Load from `RESULTWIRE_JSON__*` variables
    ///
    /// Sizes accept plain byte counts or "64KB"/"16MB"/"1GB".
    pub fn try_from_env() -> Result<Self> {
        Ok(load_from_env::<JsonWireConfig>(ENV_PREFIX)?)
    }

    /// Like [`try_from_env`](Self::try_from_env), falling back to defaults
    pub fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid JSON wire config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Log configuration on startup
    pub fn log_config(&self) {
        let max_payload = if self.max_payload_bytes == 0 {
            "unlimited".to_string()
        } else {
            format!("{}KB", self.max_payload_bytes / 1024)
        };
        info!(
            "JSON wire config: initial_buffer={}KB, max_payload={}",
            self.initial_buffer_bytes / 1024,
            max_payload
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-wide; every RESULTWIRE_JSON__ case lives in this test
    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("RESULTWIRE_JSON__MAX_PAYLOAD_BYTES", "64KB");
        std::env::set_var("RESULTWIRE_JSON__INITIAL_BUFFER_BYTES", "1024");
        let config = JsonWireConfig::try_from_env().unwrap();
        assert_eq!(config.max_payload_bytes, 64 * 1024);
        assert_eq!(config.initial_buffer_bytes, 1024);
        assert_eq!(JsonWireConfig::from_env().max_payload_bytes, 64 * 1024);

        std::env::set_var("RESULTWIRE_JSON__MAX_PAYLOAD_BYTES", "plenty");
        let err = JsonWireConfig::try_from_env().unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        std::env::remove_var("RESULTWIRE_JSON__MAX_PAYLOAD_BYTES");
        std::env::remove_var("RESULTWIRE_JSON__INITIAL_BUFFER_BYTES");
    }

    #[test]
    fn test_sizes_deserialize_from_numbers_and_strings() {
        let config: JsonWireConfig = ::config::Config::builder()
            .set_override("max_payload_bytes", "2MB")
            .unwrap()
            .set_override("initial_buffer_bytes", 4096_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.max_payload_bytes, 2 * 1024 * 1024);
        assert_eq!(config.initial_buffer_bytes, 4096);
    }

    #[test]
    fn test_log_config_unlimited() {
        let config = JsonWireConfig {
            initial_buffer_bytes: 4096,
            max_payload_bytes: 0,
        };
        config.log_config();
        assert_eq!(config.initial_buffer_bytes, 4096);
    }
}
