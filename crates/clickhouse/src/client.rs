//! Connection handle for the analytics database.

use clickhouse::Client;
use tracing::info;

use crate::config::ClickHouseConfig;

/// Database every server has, used for statements that must run before
/// the configured database exists.
const SYSTEM_DATABASE: &str = "default";

/// HTTP client bound to the database holding `users` and `events`.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    /// Lazy: nothing is sent until the first query.
    pub fn new(config: ClickHouseConfig) -> Self {
        let mut inner = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);
        if let Some(user) = &config.username {
            inner = inner.with_user(user);
        }
        if let Some(password) = &config.password {
            inner = inner.with_password(password);
        }

        info!(url = %config.url, database = %config.database, "ClickHouse store configured");
        Self { inner, config }
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Same credentials, bound to the server's `default` database.
    pub fn admin(&self) -> Client {
        self.inner.clone().with_database(SYSTEM_DATABASE)
    }

    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }
}
