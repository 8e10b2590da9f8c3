//! ClickHouse health checks and schema bootstrap.

use metrics_core::{Error, Result};
use tracing::{debug, error, info};

use crate::client::ClickHouseClient;
use crate::schema::{all_tables, create_database};

/// Check ClickHouse connection health.
pub async fn check_connection(client: &ClickHouseClient) -> bool {
    match client.inner().query("SELECT 1").fetch_one::<u8>().await {
        Ok(_) => {
            debug!("ClickHouse connection healthy");
            true
        }
        Err(e) => {
            error!("ClickHouse health check failed: {}", e);
            false
        }
    }
}

/// Create the database and both tables if they do not exist.
pub async fn init_schema(client: &ClickHouseClient) -> Result<()> {
    let database = &client.config().database;

    client
        .admin()
        .query(&create_database(database))
        .execute()
        .await
        .map_err(|e| Error::storage("clickhouse", format!("Failed to create database: {}", e)))?;

    for ddl in all_tables() {
        client
            .inner()
            .query(ddl)
            .execute()
            .await
            .map_err(|e| Error::storage("clickhouse", format!("Failed to execute DDL: {}", e)))?;
    }

    info!(database = %database, "ClickHouse schema initialized");
    Ok(())
}
