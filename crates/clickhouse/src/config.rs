//! ClickHouse configuration.

use metrics_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// ClickHouse store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    /// ClickHouse HTTP URL
    pub url: String,
    /// Database holding the `users` and `events` tables
    #[serde(default = "default_database")]
    pub database: String,
    /// Username (optional)
    pub username: Option<String>,
    /// Password (optional)
    pub password: Option<String>,
    /// Create the database and tables on startup
    #[serde(default)]
    pub init_schema: bool,
}

fn default_database() -> String {
    "product_analytics".to_string()
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".to_string(),
            database: default_database(),
            username: None,
            password: None,
            init_schema: false,
        }
    }
}

impl ClickHouseConfig {
    /// Rejects settings the HTTP client cannot use.
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(Error::config(format!(
                "clickhouse.url must be an http(s) URL, got '{}'",
                self.url
            )));
        }
        let valid_name = !self.database.is_empty()
            && self
                .database
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err(Error::config(format!(
                "clickhouse.database '{}' is not a plain identifier",
                self.database
            )));
        }
        Ok(())
    }
}
