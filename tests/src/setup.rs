//! Common test setup functions.

use clickhouse_store::schema::create_database;
use clickhouse_store::{init_schema, ClickHouseClient, ClickHouseStore};
use metrics_core::{Event, MemoryStore, MetricsConfig, Snapshot, User};
use metrics_engine::MetricsEngine;
use uuid::Uuid;

use crate::containers::TestContainers;
use crate::fixtures;

/// Engine over the fixture dataset, loaded through a `MemoryStore`.
pub async fn fixture_engine(config: &MetricsConfig) -> MetricsEngine {
    engine_over(fixtures::users(), fixtures::events(), config).await
}

/// Engine over arbitrary rows, loaded through a `MemoryStore`.
pub async fn engine_over(users: Vec<User>, events: Vec<Event>, config: &MetricsConfig) -> MetricsEngine {
    init_test_tracing();

    let store = MemoryStore::new(users, events);
    let snapshot = Snapshot::load(&store).await.expect("memory store never fails");
    MetricsEngine::from_config(snapshot, config).expect("valid test config")
}

/// Installs a subscriber once per test binary; later calls are no-ops.
pub fn init_test_tracing() {
    telemetry::init_tracing(telemetry::TracingConfig::new().with_filter("warn"));
}

/// A fresh database on a ClickHouse test server.
///
/// Each context gets its own database, so tests can lay out tables freely.
pub struct ClickHouseContext {
    pub containers: TestContainers,
    pub store: ClickHouseStore,
}

impl ClickHouseContext {
    /// Start ClickHouse and create an empty, uniquely named database.
    pub async fn new() -> Self {
        init_test_tracing();

        let containers = TestContainers::start().await;
        let database = format!("metrics_{}", Uuid::new_v4().simple());
        let client = ClickHouseClient::new(containers.config(&database));

        client
            .admin()
            .query(&create_database(&database))
            .execute()
            .await
            .expect("Failed to create test database");

        Self {
            containers,
            store: ClickHouseStore::from_client(client),
        }
    }

    /// Create the standard `users` and `events` tables.
    pub async fn init_schema(&self) {
        init_schema(self.store.client())
            .await
            .expect("Failed to initialize schema");
    }

    /// Run a DDL or INSERT statement in the test database.
    pub async fn execute(&self, sql: &str) {
        self.store
            .client()
            .inner()
            .query(sql)
            .execute()
            .await
            .unwrap_or_else(|e| panic!("Failed to execute {}: {}", sql, e));
    }
}
