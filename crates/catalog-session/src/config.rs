//! Session configuration.

use std::time::Duration;

use catalog_core::DEFAULT_PAGE_SIZE;
use catalog_fetch::{millis, DEFAULT_TOTAL_TIMEOUT};
use serde::{Deserialize, Serialize};

use crate::error::SessionConfigError;

/// Quiet interval before a typed term is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tunables for a `SearchSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Rows per page when the session starts.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest page size callers may request. `None` means no ceiling.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: Option<u32>,
    /// Quiet interval for `set_term`.
    #[serde(rename = "debounce_ms", with = "millis", default = "default_debounce")]
    pub debounce: Duration,
    /// Ceiling for one lookup.
    #[serde(rename = "fetch_timeout_ms", with = "millis", default = "default_fetch_timeout")]
    pub fetch_timeout: Duration,
    /// Abort the task of a superseded fetch.
    #[serde(default = "default_true")]
    pub abort_superseded: bool,
    /// Issue the unfiltered first-page lookup as soon as the session starts.
    #[serde(default = "default_true")]
    pub fetch_on_start: bool,
    /// Buffer size of the event stream.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> Option<u32> {
    Some(100)
}

fn default_debounce() -> Duration {
    DEFAULT_DEBOUNCE
}

fn default_fetch_timeout() -> Duration {
    DEFAULT_TOTAL_TIMEOUT
}

fn default_true() -> bool {
    true
}

fn default_event_capacity() -> usize {
    64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            debounce: default_debounce(),
            fetch_timeout: default_fetch_timeout(),
            abort_superseded: true,
            fetch_on_start: true,
            event_capacity: default_event_capacity(),
        }
    }
}

impl SessionConfig {
    /// Set the starting page size.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the page size ceiling.
    pub fn with_max_page_size(mut self, max: Option<u32>) -> Self {
        self.max_page_size = max;
        self
    }

    /// Set the debounce interval.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the fetch ceiling.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Enable or disable aborting superseded fetch tasks.
    pub fn with_abort_superseded(mut self, abort: bool) -> Self {
        self.abort_superseded = abort;
        self
    }

    /// Enable or disable the initial fetch.
    pub fn with_fetch_on_start(mut self, fetch: bool) -> Self {
        self.fetch_on_start = fetch;
        self
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        if self.default_page_size == 0 {
            return Err(SessionConfigError::ZeroPageSize);
        }
        if let Some(max) = self.max_page_size {
            if max < self.default_page_size {
                return Err(SessionConfigError::MaxBelowDefault {
                    default: self.default_page_size,
                    max,
                });
            }
        }
        if self.fetch_timeout.is_zero() {
            return Err(SessionConfigError::ZeroTimeout);
        }
        if self.event_capacity == 0 {
            return Err(SessionConfigError::ZeroEventCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, Some(100));
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(config.abort_superseded);
        assert!(config.fetch_on_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"debounce_ms": 150, "max_page_size": null}"#).unwrap();
        assert_eq!(config.debounce, Duration::from_millis(150));
        assert_eq!(config.max_page_size, None);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            SessionConfig::default().with_page_size(0).validate(),
            Err(SessionConfigError::ZeroPageSize)
        );
        assert_eq!(
            SessionConfig::default()
                .with_page_size(50)
                .with_max_page_size(Some(20))
                .validate(),
            Err(SessionConfigError::MaxBelowDefault { default: 50, max: 20 })
        );
        assert_eq!(
            SessionConfig::default()
                .with_fetch_timeout(Duration::ZERO)
                .validate(),
            Err(SessionConfigError::ZeroTimeout)
        );
    }
}
