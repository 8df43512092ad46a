//! GitHub security-alert provider.
//!
//! This module integrates with GitHub's repository security APIs:
//!
//! - **Code scanning**: static-analysis findings (CodeQL and third-party tools)
//! - **Secret scanning**: exposed credentials, restricted to generic secret types
//! - **Dependabot**: vulnerable dependency advisories
//!
//! ## Authentication
//!
//! Requires a personal access token with the `security_events` scope (and
//! `repo` for secret-scanning and Dependabot access). Repositories where a
//! scope or feature is missing yield empty results rather than errors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use secdash_alerts::providers::{AlertProvider, GithubAlertProvider, GithubClient};
//!
//! let client = GithubClient::new("ghp_xxx")?;
//! let provider = GithubAlertProvider::new(client, Duration::from_secs(300));
//! let fetched = provider
//!     .fetch_alerts(&["acme/api".to_string()], false)
//!     .await?;
//! ```

mod client;
pub mod mapper;
mod models;
mod provider;

/// Provider identifier used in alert ids, cache keys, and health payloads.
pub(crate) const PROVIDER: &str = "github";

pub use client::GithubClient;
pub use models::*;
pub use provider::GithubAlertProvider;
