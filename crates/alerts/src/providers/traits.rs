//! Alert provider trait and common types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::kpi::KpiSummary;
use crate::model::SecurityAlert;

/// Errors that can occur during alert provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Authentication error (missing or invalid token).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rate-limit information was not available.
    #[error("Rate limit unavailable: {0}")]
    RateLimitUnavailable(String),
}

/// Advisory rate-limit budget from the most recent upstream response.
///
/// Never used to block requests; the orchestrator only reads it to decide
/// whether to stretch cache TTLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitSnapshot {
    /// Total request budget for the current window.
    pub limit: u64,
    /// Requests remaining in the current window.
    pub remaining: u64,
    /// When the window resets.
    pub reset: DateTime<Utc>,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedAlerts {
    /// Merged alerts across all repositories and categories.
    pub alerts: Vec<SecurityAlert>,
    /// Rollup computed over exactly these alerts.
    pub kpi: KpiSummary,
    /// When the aggregation ran.
    pub fetched_at: DateTime<Utc>,
}

/// Upstream reachability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Result of a provider health probe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    /// Whether the upstream API answered the probe.
    pub status: HealthStatus,
    /// Provider name.
    pub provider: String,
    /// Rate-limit budget observed by the probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitSnapshot>,
    /// Failure reason when the probe did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trait for security-alert providers.
///
/// Implementations own fetching, normalization, caching, and KPI rollup
/// for one upstream source.
#[async_trait]
pub trait AlertProvider: Send + Sync {
    /// Get the provider name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Aggregate alerts across the given repositories.
    ///
    /// Individual repository/category failures degrade to empty slices and
    /// are logged; the call still succeeds with whatever was fetched.
    ///
    /// # Errors
    ///
    /// Returns an error only when the aggregation itself cannot proceed,
    /// not when individual fetch tasks fail.
    async fn fetch_alerts(
        &self,
        repositories: &[String],
        skip_cache: bool,
    ) -> Result<FetchedAlerts, ProviderError>;

    /// Probe upstream reachability and the current rate-limit budget.
    ///
    /// Never fails: probe errors are reported inside the result.
    async fn health_check(&self) -> ProviderHealth;
}
