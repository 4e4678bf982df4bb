use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on each store round trip. `None` waits indefinitely.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: Option<u64>,
}

fn default_request_timeout_secs() -> Option<u64> {
    Some(DEFAULT_REQUEST_TIMEOUT_SECS)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// `0` disables the timeout.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout_secs: (secs > 0).then_some(secs),
        }
    }

    /// `Some(0)` is treated like `None`.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timeout_field_uses_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_disables_timeout() {
        assert_eq!(EngineConfig::with_timeout_secs(0).request_timeout(), None);
        assert_eq!(
            EngineConfig::with_timeout_secs(5).request_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn zero_from_config_file_disables_timeout() {
        let config: EngineConfig = serde_json::from_str(r#"{"request_timeout_secs":0}"#).unwrap();
        assert_eq!(config.request_timeout(), None);

        let config: EngineConfig = serde_json::from_str(r#"{"request_timeout_secs":null}"#).unwrap();
        assert_eq!(config.request_timeout(), None);
    }
}
