//! Exchange timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time to wait for a response.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default sleep between `data_available` polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Timing of the wait-for-response loop, fixed at client construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Give up once this many milliseconds have elapsed without data.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Sleep this long between polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ExchangeConfig {
    /// Set the response timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Response timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(5000));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_builder() {
        let config = ExchangeConfig::default()
            .with_timeout_ms(250)
            .with_poll_interval_ms(1);
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.poll_interval_ms, 1);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: ExchangeConfig = serde_json::from_str(r#"{"timeout_ms": 100}"#).unwrap();
        assert_eq!(config.timeout_ms, 100);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }
}
