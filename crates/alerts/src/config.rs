//! Runtime configuration loaded from the environment.

use std::env;
use std::time::Duration;

use crate::providers::ProviderError;

const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_PORT: u16 = 8080;

/// Alert dashboard configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub personal access token with `security_events` scope.
    pub github_token: String,
    /// Repositories to monitor, as `owner/name` slugs.
    pub repositories: Vec<String>,
    /// Lifetime of cached alert slices.
    pub cache_ttl: Duration,
    /// HTTP server port.
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `GITHUB_TOKEN` and `SECURITY_REPOS` (comma-separated `owner/name`
    /// slugs) are required. `ALERT_CACHE_TTL_SECONDS` defaults to 300 and
    /// `PORT` to 8080; unparsable values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is missing or empty, or when no
    /// repository is configured.
    pub fn from_env() -> Result<Self, ProviderError> {
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ProviderError::Config("GITHUB_TOKEN environment variable not set".to_string())
            })?;

        let repositories: Vec<String> = env::var("SECURITY_REPOS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|repo| !repo.is_empty())
            .map(ToString::to_string)
            .collect();
        if repositories.is_empty() {
            return Err(ProviderError::Config(
                "SECURITY_REPOS must list at least one owner/name repository".to_string(),
            ));
        }

        let cache_ttl = Duration::from_secs(
            env::var("ALERT_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
        );

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            github_token,
            repositories,
            cache_ttl,
            port,
        })
    }
}
