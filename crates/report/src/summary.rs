//! Executive summary of the key product metrics.

use std::fmt;

use chrono::NaiveDate;
use metrics_core::{round2, MetricsConfig, Result};
use metrics_engine::{
    DailyActiveUsers, FeatureAdoption, MetricsEngine, MonthlyActiveUsers, PlanShare,
};
use serde::Serialize;
use tracing::info;

/// Number of features listed in the digest.
const TOP_FEATURES: usize = 3;

const RULE: &str = "============================================================";

/// Key metrics digest, rendered by its `Display` impl.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_users: u64,
    pub total_events: u64,
    /// 0 when there are no users
    pub events_per_user: f64,
    pub latest_dau: Option<DailyActiveUsers>,
    pub latest_mau: Option<MonthlyActiveUsers>,
    /// Latest DAU as a percentage of latest MAU
    pub stickiness: Option<f64>,
    pub top_features: Vec<FeatureAdoption>,
    pub plans: Vec<PlanShare>,
    pub retention_window_days: i64,
    /// Unweighted mean of per-cohort retention rates
    pub avg_retention: Option<f64>,
    pub churn_inactive_days: i64,
    /// Reference date the churn figures are relative to
    pub churn_as_of: Option<NaiveDate>,
    /// Unweighted mean of per-plan churn rates
    pub avg_churn: Option<f64>,
}

impl SummaryReport {
    /// Builds the digest. Any fatal engine error is returned and no digest
    /// is produced.
    pub fn build(engine: &MetricsEngine, config: &MetricsConfig) -> Result<Self> {
        config.validate()?;

        let retention = engine.retention_by_cohort(config.retention_window_days)?;
        let churn_as_of = engine.resolve_as_of(config.churn_as_of);
        let churn = match churn_as_of {
            Some(as_of) => engine.churn_by_plan(config.churn_inactive_days, as_of)?,
            None => Vec::new(),
        };

        let total_users = engine.total_users();
        let total_events = engine.total_events();
        let events_per_user = if total_users == 0 {
            0.0
        } else {
            total_events as f64 / total_users as f64
        };

        let mut top_features = engine.feature_adoption();
        top_features.truncate(TOP_FEATURES);

        let report = Self {
            total_users,
            total_events,
            events_per_user,
            latest_dau: engine.daily_active_users().pop(),
            latest_mau: engine.monthly_active_users().pop(),
            stickiness: engine.stickiness(),
            top_features,
            plans: engine.plan_distribution(),
            retention_window_days: config.retention_window_days,
            avg_retention: mean(retention.iter().map(|r| r.retention_rate)),
            churn_inactive_days: config.churn_inactive_days,
            churn_as_of,
            avg_churn: mean(churn.iter().map(|c| c.churn_rate)),
        };

        info!(
            users = report.total_users,
            events = report.total_events,
            cohorts = retention.len(),
            plans = churn.len(),
            "Built summary report"
        );
        Ok(report)
    }
}

/// Unweighted mean rounded to 2 decimals, `None` for no values.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(round2(sum / count as f64))
}

/// Formats a count with thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "PRODUCT ANALYTICS SUMMARY REPORT")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;

        writeln!(f, "Total Users: {}", format_count(self.total_users))?;
        writeln!(f, "Total Events: {}", format_count(self.total_events))?;
        writeln!(f, "Events per User: {:.1}", self.events_per_user)?;
        writeln!(f)?;

        match &self.latest_dau {
            Some(dau) => writeln!(
                f,
                "Latest DAU: {} ({})",
                format_count(dau.active_users),
                dau.date
            )?,
            None => writeln!(f, "Latest DAU: n/a")?,
        }
        match &self.latest_mau {
            Some(mau) => writeln!(
                f,
                "Latest MAU: {} ({})",
                format_count(mau.active_users),
                mau.month
            )?,
            None => writeln!(f, "Latest MAU: n/a")?,
        }
        writeln!(f, "DAU/MAU Ratio: {}", format_percent(self.stickiness))?;
        writeln!(f)?;

        writeln!(f, "Top {} Features:", TOP_FEATURES)?;
        if self.top_features.is_empty() {
            writeln!(f, "   (none)")?;
        }
        for (i, feature) in self.top_features.iter().enumerate() {
            writeln!(
                f,
                "   {}. {}: {} uses ({} users)",
                i + 1,
                feature.feature,
                format_count(feature.total_uses),
                format_count(feature.unique_users)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Plan Distribution:")?;
        if self.plans.is_empty() {
            writeln!(f, "   (none)")?;
        }
        for plan in &self.plans {
            writeln!(
                f,
                "   {}: {} users ({:.1}%)",
                plan.plan,
                format_count(plan.users),
                plan.share
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "Average {}-Day Retention: {}",
            self.retention_window_days,
            format_percent(self.avg_retention)
        )?;
        let as_of = self
            .churn_as_of
            .map(|d| d.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            f,
            "Average Churn Rate (>{} days inactive, as of {}): {}",
            self.churn_inactive_days,
            as_of,
            format_percent(self.avg_churn)
        )?;
        writeln!(f)?;
        write!(f, "{}", RULE)
    }
}
