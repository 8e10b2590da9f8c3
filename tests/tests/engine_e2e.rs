//! End-to-end tests for the metrics engine.
//!
//! Data flows through the same path as production:
//! MemoryStore → Snapshot::load (cleaning) → MetricsEngine
//!
//! Expected values are worked out by hand from `fixtures::users()` and
//! `fixtures::events()`.

use integration_tests::{fixtures, fixtures::date, setup};
use metrics_core::{EngagementThresholds, MetricsConfig, YearMonth};
use metrics_engine::{densify_daily, EngagementLevel};

fn ym(s: &str) -> YearMonth {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_active_users() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;

    let dau = engine.daily_active_users();
    assert_eq!(dau.len(), 9);
    assert_eq!(dau[0].date, date(2024, 1, 2));
    let latest = dau.last().unwrap();
    assert_eq!(latest.date, date(2024, 2, 15));
    // alice, dave and the orphan
    assert_eq!(latest.active_users, 3);

    let mau = engine.monthly_active_users();
    let months: Vec<_> = mau.iter().map(|m| (m.month, m.active_users)).collect();
    assert_eq!(months, vec![(ym("2024-01"), 3), (ym("2024-02"), 3)]);

    assert_eq!(engine.stickiness(), Some(100.0));

    let dense = densify_daily(&dau);
    assert_eq!(dense.len(), 45);
    assert_eq!(dense.iter().map(|d| d.active_users).sum::<u64>(), 11);
}

#[tokio::test]
async fn test_retention_by_first_activity_cohort() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;

    let rows = engine.retention_by_cohort(7).unwrap();
    let cells: Vec<_> = rows
        .iter()
        .map(|r| (r.cohort, r.total_users, r.retained_users, r.retention_rate))
        .collect();
    assert_eq!(
        cells,
        vec![
            // alice and carol come back exactly a week later, bob does not
            (ym("2024-01"), 3, 2, 66.67),
            // dave returns, the orphan's first day is its last
            (ym("2024-02"), 2, 1, 50.0),
        ]
    );

    // Nobody has activity 30 days after their first event
    let month = engine.retention_by_cohort(30).unwrap();
    assert!(month.iter().all(|r| r.retained_users == 0));
}

#[tokio::test]
async fn test_churn_as_of_latest_event() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;

    let as_of = engine.resolve_as_of(None).unwrap();
    assert_eq!(as_of, date(2024, 2, 15));

    let rows = engine.churn_by_plan(30, as_of).unwrap();
    let cells: Vec<_> = rows
        .iter()
        .map(|r| (r.plan.as_str(), r.total_users, r.churned, r.churn_rate))
        .collect();
    assert_eq!(
        cells,
        vec![
            ("Enterprise", 1, 0, 0.0),
            // bob idle 40 days; erin has no events and is not counted
            ("Free", 2, 1, 50.0),
            ("Pro", 1, 0, 0.0),
        ]
    );

    let later = engine.churn_by_plan(30, date(2024, 4, 1)).unwrap();
    assert!(later.iter().all(|r| r.churn_rate == 100.0));
}

#[tokio::test]
async fn test_feature_adoption() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;

    let rows = engine.feature_adoption();
    let cells: Vec<_> = rows
        .iter()
        .map(|r| {
            (
                r.feature.as_str(),
                r.total_uses,
                r.unique_users,
                r.avg_duration,
                r.days_active,
            )
        })
        .collect();
    assert_eq!(
        cells,
        vec![
            ("search", 5, 4, 10.0, 4),
            ("export", 3, 2, 23.33, 3),
            ("dashboard", 2, 2, 8.5, 2),
        ]
    );
}

#[tokio::test]
async fn test_segmentation_and_distribution() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;

    let segments = engine
        .user_segmentation(EngagementThresholds::default())
        .unwrap();
    let ids: Vec<_> = segments.iter().map(|s| s.user_id.as_str()).collect();
    assert_eq!(ids, vec!["alice", "bob", "carol", "dave", "erin"]);

    let alice = &segments[0];
    assert_eq!(alice.total_events, 3);
    assert_eq!(alice.active_days, 3);
    assert_eq!(alice.features_used, 2);
    assert_eq!(alice.avg_session_duration, 20.0);

    let erin = &segments[4];
    assert_eq!(erin.total_events, 0);
    assert_eq!(erin.engagement_level, EngagementLevel::Low);

    // With tiny thresholds the three-event users become High
    let tight = EngagementThresholds::new(2, 1);
    let distribution = engine.engagement_distribution(tight).unwrap();
    let counts: Vec<_> = distribution.iter().map(|d| (d.level, d.users)).collect();
    assert_eq!(
        counts,
        vec![
            (EngagementLevel::High, 2),
            (EngagementLevel::Medium, 2),
            (EngagementLevel::Low, 1),
        ]
    );
}

#[tokio::test]
async fn test_cohort_matrix_and_plans() {
    let engine = setup::fixture_engine(&MetricsConfig::default()).await;

    let matrix: Vec<_> = engine
        .cohort_activity_matrix()
        .iter()
        .map(|c| (c.cohort, c.activity_month, c.active_users))
        .collect();
    assert_eq!(
        matrix,
        vec![
            (ym("2024-01"), ym("2024-01"), 3),
            (ym("2024-01"), ym("2024-02"), 1),
            (ym("2024-02"), ym("2024-02"), 1),
        ]
    );

    let plans: Vec<_> = engine
        .plan_distribution()
        .iter()
        .map(|p| (p.plan.clone(), p.users, p.share))
        .collect();
    assert_eq!(
        plans,
        vec![
            ("Enterprise".to_string(), 1, 20.0),
            ("Free".to_string(), 3, 60.0),
            ("Pro".to_string(), 1, 20.0),
        ]
    );
}

#[tokio::test]
async fn test_reporting_zone_shifts_dates() {
    let late = fixtures::event_at("alice", date(2024, 1, 31), 23, 30, None, 0.0);
    let config = MetricsConfig {
        utc_offset_minutes: 60,
        ..MetricsConfig::default()
    };
    let engine = setup::engine_over(fixtures::users(), vec![late.clone()], &config).await;

    let dau = engine.daily_active_users();
    assert_eq!(dau[0].date, date(2024, 2, 1));
    assert_eq!(engine.monthly_active_users()[0].month, ym("2024-02"));

    let utc = setup::engine_over(fixtures::users(), vec![late], &MetricsConfig::default()).await;
    assert_eq!(utc.daily_active_users()[0].date, date(2024, 1, 31));
}

#[tokio::test]
async fn test_snapshot_cleaning_through_store() {
    let mut users = fixtures::users();
    users.push(fixtures::user("alice", date(2023, 6, 1), "Free", "GB"));
    users.push(fixtures::user("", date(2024, 1, 1), "Free", "US"));

    let mut events = fixtures::events();
    let duplicate = events[0].clone();
    events.push(duplicate);
    events.push(fixtures::event("bob", date(2024, 1, 7), None, -5.0));

    let engine = setup::engine_over(users, events, &MetricsConfig::default()).await;

    let stats = engine.snapshot().stats();
    assert_eq!(stats.duplicate_users, 1);
    assert_eq!(stats.invalid_users, 1);
    assert_eq!(stats.duplicate_events, 1);
    assert_eq!(stats.invalid_events, 1);
    assert_eq!(stats.total_dropped(), 4);

    assert_eq!(engine.total_users(), 5);
    assert_eq!(engine.total_events(), 11);

    // First occurrence wins
    let alice = engine
        .snapshot()
        .users()
        .iter()
        .find(|u| u.user_id == "alice")
        .unwrap();
    assert_eq!(alice.plan, "Pro");
}

#[tokio::test]
async fn test_empty_dataset() {
    let engine = setup::engine_over(vec![], vec![], &MetricsConfig::default()).await;

    assert!(engine.daily_active_users().is_empty());
    assert!(engine.monthly_active_users().is_empty());
    assert_eq!(engine.stickiness(), None);
    assert!(engine.retention_by_cohort(7).unwrap().is_empty());
    assert_eq!(engine.resolve_as_of(None), None);
    assert!(engine.feature_adoption().is_empty());
    assert!(engine.cohort_activity_matrix().is_empty());
    assert!(engine.plan_distribution().is_empty());
    assert!(engine
        .user_segmentation(EngagementThresholds::default())
        .unwrap()
        .is_empty());
}
