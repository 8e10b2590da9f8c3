//! End-to-end tests for the summary digest.

use integration_tests::{fixtures::date, setup};
use metrics_core::{Error, MetricsConfig};
use report::SummaryReport;

#[tokio::test]
async fn test_digest_over_fixture_dataset() {
    let config = MetricsConfig::default();
    let engine = setup::fixture_engine(&config).await;

    let report = SummaryReport::build(&engine, &config).unwrap();
    assert_eq!(report.total_users, 5);
    assert_eq!(report.total_events, 11);
    assert_eq!(report.churn_as_of, Some(date(2024, 2, 15)));
    assert_eq!(report.avg_churn, Some(16.67));
    let retention = report.avg_retention.unwrap();
    assert!((retention - 58.34).abs() < 0.011, "got {}", retention);

    let text = report.to_string();
    for line in [
        "Total Users: 5",
        "Total Events: 11",
        "Events per User: 2.2",
        "Latest DAU: 3 (2024-02-15)",
        "Latest MAU: 3 (2024-02)",
        "DAU/MAU Ratio: 100.0%",
        "   1. search: 5 uses (4 users)",
        "   2. export: 3 uses (2 users)",
        "   3. dashboard: 2 uses (2 users)",
        "   Free: 3 users (60.0%)",
        "Average 7-Day Retention: 58.3%",
        "Average Churn Rate (>30 days inactive, as of 2024-02-15): 16.7%",
    ] {
        assert!(text.contains(line), "missing {:?} in:\n{}", line, text);
    }
}

#[tokio::test]
async fn test_explicit_churn_date_and_window() {
    let config = MetricsConfig {
        retention_window_days: 1,
        churn_as_of: Some(date(2024, 3, 31)),
        ..MetricsConfig::default()
    };
    let engine = setup::fixture_engine(&config).await;

    let report = SummaryReport::build(&engine, &config).unwrap();
    assert_eq!(report.churn_as_of, Some(date(2024, 3, 31)));
    // Everyone active by mid-February is idle for more than 30 days
    assert_eq!(report.avg_churn, Some(100.0));
    // Only bob returns the next day; the February cohort has nobody
    assert_eq!(report.retention_window_days, 1);
    assert!(report
        .to_string()
        .contains("Average 1-Day Retention: 16.7%"));
}

#[tokio::test]
async fn test_digest_serializes() {
    let config = MetricsConfig::default();
    let engine = setup::fixture_engine(&config).await;

    let report = SummaryReport::build(&engine, &config).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["churn_as_of"], "2024-02-15");
    assert_eq!(json["latest_mau"]["month"], "2024-02");
    assert_eq!(json["top_features"][0]["feature"], "search");
}

#[tokio::test]
async fn test_invalid_config_produces_no_digest() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;
    let config = MetricsConfig {
        churn_inactive_days: -1,
        ..MetricsConfig::default()
    };

    let err = SummaryReport::build(&engine, &config).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "churn_inactive_days", .. }));
    assert_eq!(err.error_code(), "PARAM_001");
}
