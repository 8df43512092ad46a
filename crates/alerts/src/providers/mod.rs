//! Security-alert provider implementations.
//!
//! This module provides integrations with:
//!
//! - GitHub - code scanning, secret scanning, and Dependabot alerts

pub mod github;
mod traits;

pub use github::{GithubAlertProvider, GithubClient};
pub use traits::{
    AlertProvider, FetchedAlerts, HealthStatus, ProviderError, ProviderHealth, RateLimitSnapshot,
};
