//! Catalog API configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timeout::TimeoutConfig;

/// Where the catalog API lives and how it names its query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme, host and port (e.g., "http://127.0.0.1:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the product search endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the search term parameter.
    #[serde(default = "default_query_param")]
    pub query_param: String,
    /// Name of the page number parameter.
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// Name of the page size parameter.
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,
    /// Timeouts for one lookup.
    #[serde(default)]
    pub timeout: TimeoutConfig,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_endpoint() -> String {
    "/api/recent_products/".to_string()
}

fn default_query_param() -> String {
    "query".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_size_param() -> String {
    "per_page".to_string()
}

fn default_user_agent() -> String {
    concat!("catalog-fetch/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ApiConfig {
    /// Create a configuration for a base URL with default paths and names.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the endpoint path.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the timeouts.
    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the search endpoint, without query string.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        for (name, value) in [
            ("query", &self.query_param),
            ("page", &self.page_param),
            ("page size", &self.page_size_param),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyParamName(name));
            }
        }
        if self.timeout.total.is_zero() {
            return Err(ConfigError::ZeroTimeout("total"));
        }
        if self.timeout.connect.is_zero() {
            return Err(ConfigError::ZeroTimeout("connect"));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            query_param: default_query_param(),
            page_param: default_page_param(),
            page_size_param: default_page_size_param(),
            timeout: TimeoutConfig::default(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let config = ApiConfig::new("http://localhost:8000/").with_endpoint("/api/recent_products/");
        assert_eq!(config.endpoint_url(), "http://localhost:8000/api/recent_products/");

        let config = ApiConfig::new("http://localhost:8000").with_endpoint("recent_products");
        assert_eq!(config.endpoint_url(), "http://localhost:8000/recent_products");
    }

    #[test]
    fn test_endpoint_url_absolute() {
        let config = ApiConfig::new("http://a").with_endpoint("http://b/products");
        assert_eq!(config.endpoint_url(), "http://b/products");
    }

    #[test]
    fn test_validate() {
        assert!(ApiConfig::default().validate().is_ok());
        assert_eq!(
            ApiConfig::new("localhost:8000").validate(),
            Err(ConfigError::InvalidBaseUrl("localhost:8000".to_string()))
        );

        let mut config = ApiConfig::default();
        config.page_size_param = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyParamName("page size")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"base_url": "http://api.test", "page_size_param": "page_size"}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://api.test");
        assert_eq!(config.page_size_param, "page_size");
        assert_eq!(config.query_param, "query");
        assert_eq!(config.endpoint, "/api/recent_products/");
    }
}
