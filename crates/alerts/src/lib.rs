#![allow(clippy::doc_markdown)] // Allow brand names like GitHub, Dependabot without backticks

//! Security-alert aggregation for GitHub repositories.
//!
//! This crate fetches and normalizes repository security alerts across
//! three categories:
//!
//! - **Code scanning** - static-analysis findings (CodeQL and third-party tools)
//! - **Secret scanning** - exposed credentials
//! - **Dependabot** - vulnerable dependency advisories
//!
//! ## Features
//!
//! - One canonical [`SecurityAlert`] model across all categories
//! - Concurrent per-(repository, category) fetching; one failing slice
//!   never fails the whole result
//! - TTL caching with lifetime extension when the rate limit runs low
//! - [`KpiSummary`] rollups: open counts by severity, category, and
//!   repository, plus 30-day fixed/new counters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use secdash_alerts::providers::{AlertProvider, GithubAlertProvider, GithubClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create client from the GITHUB_TOKEN environment variable
//!     let client = GithubClient::from_env()?;
//!     let provider = GithubAlertProvider::new(client, Duration::from_secs(300));
//!
//!     let fetched = provider
//!         .fetch_alerts(&["acme/api".to_string(), "acme/web".to_string()], false)
//!         .await?;
//!
//!     println!("{} open alerts", fetched.kpi.total_open);
//!     for alert in fetched.alerts {
//!         println!("[{}] {} ({})", alert.severity, alert.title, alert.repository);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Health Checks
//!
//! ```rust,ignore
//! let health = provider.health_check().await;
//! if let Some(rate_limit) = health.rate_limit {
//!     println!("{} of {} requests remaining", rate_limit.remaining, rate_limit.limit);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod kpi;
pub mod model;
pub mod providers;

pub use cache::TtlCache;
pub use config::Config;
pub use kpi::{CategoryCounts, KpiSummary, SeverityCounts};
pub use model::{
    AlertCategory, AlertDetails, AlertState, CodeScanningDetails, DependabotDetails,
    SecretScanningDetails, SecurityAlert, Severity,
};
pub use providers::{
    AlertProvider, FetchedAlerts, GithubAlertProvider, GithubClient, HealthStatus, ProviderError,
    ProviderHealth, RateLimitSnapshot,
};
