//! Product Metrics
//!
//! Loads the `users` and `events` relations from ClickHouse, computes the
//! product metrics and prints the summary digest to stdout.

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use clickhouse_store::{check_connection, init_schema, ClickHouseConfig, ClickHouseStore};
use metrics_core::{DataStore, MetricsConfig, Snapshot};
use metrics_engine::MetricsEngine;
use report::SummaryReport;
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    metrics: MetricsConfig,

    #[serde(default)]
    clickhouse: ClickHouseConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Product Metrics v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    config
        .metrics
        .validate()
        .context("Invalid metrics configuration")?;
    config
        .clickhouse
        .validate()
        .context("Invalid ClickHouse configuration")?;

    let store = ClickHouseStore::new(config.clickhouse.clone());

    if !check_connection(store.client()).await {
        error!(url = %config.clickhouse.url, "ClickHouse connection: unhealthy");
        bail!("ClickHouse at {} is unreachable", config.clickhouse.url);
    }
    info!("ClickHouse connection: healthy");

    if config.clickhouse.init_schema {
        init_schema(store.client())
            .await
            .context("Failed to initialize ClickHouse schema")?;
    }

    match store.table_sizes().await {
        Ok((users, events)) => info!(users, events, "Source table sizes"),
        Err(e) => warn!("Could not count source rows: {}", e),
    }

    let snapshot = Snapshot::load(&store)
        .await
        .with_context(|| format!("Failed to load data from {}", store.name()))?;

    let engine = MetricsEngine::from_config(snapshot, &config.metrics)
        .context("Failed to build metrics engine")?;

    let report = SummaryReport::build(&engine, &config.metrics).context("Failed to build report")?;
    println!("{}", report);

    info!("Done");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables, e.g. METRICS__CLICKHOUSE__URL
        .add_source(
            config::Environment::with_prefix("METRICS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Nested parsing is unreliable for underscored field names
    if let Ok(url) = std::env::var("METRICS_CLICKHOUSE_URL") {
        config.clickhouse.url = url;
    }
    if let Ok(database) = std::env::var("METRICS_CLICKHOUSE_DATABASE") {
        config.clickhouse.database = database;
    }
    if let Ok(username) = std::env::var("METRICS_CLICKHOUSE_USERNAME") {
        config.clickhouse.username = Some(username);
    }
    if let Ok(password) = std::env::var("METRICS_CLICKHOUSE_PASSWORD") {
        config.clickhouse.password = Some(password);
    }

    Ok(config)
}
