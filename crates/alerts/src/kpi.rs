//! KPI rollup over a collection of normalized alerts.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::{AlertCategory, AlertState, SecurityAlert, Severity};

/// Open-alert counts per severity. All four buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl SeverityCounts {
    /// Sum across all buckets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.critical + self.high + self.medium + self.low
    }
}

/// Open-alert counts per category. All three buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub code_scanning: u64,
    pub secret_scanning: u64,
    pub dependabot: u64,
}

impl CategoryCounts {
    /// Sum across all buckets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.code_scanning + self.secret_scanning + self.dependabot
    }
}

/// Aggregate rollup over an alert collection.
///
/// Recomputed fresh on every fetch, never updated incrementally, so it is
/// always consistent with the alert set it was derived from.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Count of alerts in the open state.
    pub total_open: u64,
    /// Open alerts broken down by severity.
    pub by_severity: SeverityCounts,
    /// Open alerts broken down by category.
    #[serde(rename = "byType")]
    pub by_category: CategoryCounts,
    /// Open alerts per repository; only repositories with at least one
    /// open alert appear.
    pub by_repo: BTreeMap<String, u64>,
    /// Alerts fixed within the trailing 30 days, regardless of state.
    pub fixed_last_30_days: u64,
    /// Alerts created within the trailing 30 days, regardless of state.
    pub new_last_30_days: u64,
}

impl KpiSummary {
    /// Compute the rollup for `alerts` as of now.
    #[must_use]
    pub fn compute(alerts: &[SecurityAlert]) -> Self {
        Self::compute_at(alerts, Utc::now())
    }

    /// Compute the rollup with an explicit reference time.
    #[must_use]
    pub fn compute_at(alerts: &[SecurityAlert], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(30);

        let mut total_open = 0u64;
        let mut by_severity = SeverityCounts::default();
        let mut by_category = CategoryCounts::default();
        let mut by_repo = BTreeMap::new();
        let mut fixed_last_30_days = 0u64;
        let mut new_last_30_days = 0u64;

        for alert in alerts {
            if alert.state == AlertState::Open {
                total_open += 1;
                match alert.severity {
                    Severity::Critical => by_severity.critical += 1,
                    Severity::High => by_severity.high += 1,
                    Severity::Medium => by_severity.medium += 1,
                    Severity::Low => by_severity.low += 1,
                }
                match alert.category {
                    AlertCategory::CodeScanning => by_category.code_scanning += 1,
                    AlertCategory::SecretScanning => by_category.secret_scanning += 1,
                    AlertCategory::Dependabot => by_category.dependabot += 1,
                }
                *by_repo.entry(alert.repository.clone()).or_insert(0) += 1;
            }

            if let Some(fixed_at) = &alert.fixed_at {
                if parse_timestamp(fixed_at).is_some_and(|at| at > cutoff) {
                    fixed_last_30_days += 1;
                }
            }
            if parse_timestamp(&alert.created_at).is_some_and(|at| at > cutoff) {
                new_last_30_days += 1;
            }
        }

        Self {
            total_open,
            by_severity,
            by_category,
            by_repo,
            fixed_last_30_days,
            new_last_30_days,
        }
    }
}

/// Parse an ISO-8601 timestamp; empty or malformed values yield `None`.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
