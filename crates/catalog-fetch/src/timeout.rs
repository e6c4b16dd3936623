//! Timeout configuration for fetch operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ceiling for one lookup.
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout.
    #[serde(rename = "connect_ms", with = "millis", default = "default_connect")]
    pub connect: Duration,
    /// Total operation timeout.
    #[serde(rename = "total_ms", with = "millis", default = "default_total")]
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout. Connecting gets a quarter of it.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(DEFAULT_TOTAL_TIMEOUT)
    }
}

fn default_connect() -> Duration {
    TimeoutConfig::default().connect
}

fn default_total() -> Duration {
    DEFAULT_TOTAL_TIMEOUT
}

/// Serialize a `Duration` as whole milliseconds.
pub mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total() {
        let t = TimeoutConfig::from_total(Duration::from_secs(8));
        assert_eq!(t.connect, Duration::from_secs(2));
        assert_eq!(t.total, Duration::from_secs(8));
    }

    #[test]
    fn test_default_is_ten_seconds() {
        assert_eq!(TimeoutConfig::default().total, Duration::from_secs(10));
    }

    #[test]
    fn test_deserialize_millis_with_defaults() {
        let t: TimeoutConfig = serde_json::from_str(r#"{"total_ms": 2000}"#).unwrap();
        assert_eq!(t.total, Duration::from_secs(2));
        assert_eq!(t.connect, TimeoutConfig::default().connect);

        let json = serde_json::to_value(t).unwrap();
        assert_eq!(json["total_ms"], serde_json::json!(2000));
    }
}
