//! CLI configuration.

use anyhow::{Context, Result};
use catalog_fetch::ApiConfig;
use catalog_session::SessionConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog API endpoint and parameter names.
    #[serde(default)]
    pub api: ApiConfig,

    /// Search session tunables.
    #[serde(default)]
    pub session: SessionConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Collect every problem with the configuration.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Err(e) = self.api.validate() {
            problems.push(format!("api: {}", e));
        }
        if let Err(e) = self.session.validate() {
            problems.push(format!("session: {}", e));
        }
        problems
    }
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config() -> String {
    r#"# Catalog client configuration

[api]
base_url = "http://127.0.0.1:8000"
endpoint = "/api/recent_products/"
query_param = "query"
page_param = "page"
page_size_param = "per_page"

[api.timeout]
connect_ms = 2500
total_ms = 10000

[session]
default_page_size = 10
max_page_size = 100
debounce_ms = 300
fetch_timeout_ms = 10000
abort_superseded = true
fetch_on_start = true
event_capacity = 64
"#
    .to_string()
}
