//! `DataStore` implementation backed by ClickHouse.

use async_trait::async_trait;
use metrics_core::schema::{check_columns, EVENTS_COLUMNS, EVENTS_TABLE, USERS_COLUMNS, USERS_TABLE};
use metrics_core::{DataStore, Event, Result, User};
use tracing::{debug, info};

use crate::client::ClickHouseClient;
use crate::config::ClickHouseConfig;
use crate::query::{count_rows, describe_table, fetch_events, fetch_users};

/// Reads `users` and `events` from the configured database.
///
/// Column layout is checked against the contract before every read, so a
/// drifted table surfaces as `SchemaMismatch` instead of a decode error.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: ClickHouseClient,
}

impl ClickHouseStore {
    pub fn new(config: ClickHouseConfig) -> Self {
        Self {
            client: ClickHouseClient::new(config),
        }
    }

    pub fn from_client(client: ClickHouseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ClickHouseClient {
        &self.client
    }

    /// Row counts of both tables.
    pub async fn table_sizes(&self) -> Result<(u64, u64)> {
        let users = count_rows(&self.client, USERS_TABLE).await?;
        let events = count_rows(&self.client, EVENTS_TABLE).await?;
        Ok((users, events))
    }
}

#[async_trait]
impl DataStore for ClickHouseStore {
    async fn all_users(&self) -> Result<Vec<User>> {
        let columns = describe_table(&self.client, USERS_TABLE).await?;
        check_columns(USERS_TABLE, USERS_COLUMNS, &columns)?;
        debug!(columns = columns.len(), "users schema verified");

        let users = fetch_users(&self.client).await?;
        info!(rows = users.len(), "Loaded users from ClickHouse");
        Ok(users)
    }

    async fn all_events(&self) -> Result<Vec<Event>> {
        let columns = describe_table(&self.client, EVENTS_TABLE).await?;
        check_columns(EVENTS_TABLE, EVENTS_COLUMNS, &columns)?;
        debug!(columns = columns.len(), "events schema verified");

        let events = fetch_events(&self.client).await?;
        info!(rows = events.len(), "Loaded events from ClickHouse");
        Ok(events)
    }

    fn name(&self) -> &'static str {
        "clickhouse"
    }
}
