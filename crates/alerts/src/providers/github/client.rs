//! GitHub REST API client for repository security alerts.

use std::str::FromStr;
use std::sync::RwLock;

use chrono::{TimeZone, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::models::{RawCodeScanningAlert, RawDependabotAlert, RawSecretScanningAlert};
use super::PROVIDER;
use crate::model::AlertCategory;
use crate::providers::{ProviderError, RateLimitSnapshot};

const GITHUB_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const PER_PAGE: u32 = 100;

/// Secret-scanning alert types requested from GitHub. Provider-specific
/// patterns (for example `aws_access_key_id`) are excluded so the results
/// focus on generic credential leaks.
const GENERIC_SECRET_TYPES: &[&str] = &[
    "ec_private_key",
    "generic_private_key",
    "http_basic_authentication_header",
    "http_bearer_authentication_header",
    "mongodb_connection_string",
    "mysql_connection_string",
    "openssh_private_key",
    "pgp_private_key",
    "postgres_connection_string",
    "rsa_private_key",
    "password",
];

/// GitHub security-alert API client.
///
/// Fetches code-scanning, secret-scanning, and Dependabot alerts for a
/// repository and tracks the rate-limit headers of the most recent response.
#[derive(Debug)]
pub struct GithubClient {
    client: Client,
    token: String,
    base_url: String,
    rate_limit: RwLock<Option<RateLimitSnapshot>>,
}

impl GithubClient {
    /// Create a new GitHub client.
    ///
    /// # Arguments
    ///
    /// * `token` - GitHub personal access token with `security_events` scope
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(token, GITHUB_API_BASE)
    }

    /// Create a new GitHub client against a custom API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ProviderError::Auth("GitHub token is required".to_string()));
        }

        let client = Client::builder()
            .user_agent("secdash/0.1.0")
            .build()
            .map_err(ProviderError::Http)?;

        Ok(Self {
            client,
            token,
            base_url: base_url.into(),
            rate_limit: RwLock::new(None),
        })
    }

    /// Create a new GitHub client from the `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self, ProviderError> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| {
            ProviderError::Auth("GITHUB_TOKEN environment variable not set".to_string())
        })?;
        Self::new(token)
    }

    /// Rate-limit headers captured from the most recent API response.
    pub fn last_rate_limit(&self) -> Option<RateLimitSnapshot> {
        self.rate_limit.read().ok().and_then(|snapshot| *snapshot)
    }

    /// Make a GET request to the GitHub API and record its rate-limit headers.
    async fn get(&self, path_and_query: &str) -> Result<Response, ProviderError> {
        let url = format!("{}{path_and_query}", self.base_url);
        debug!(url = %url, "Making GitHub API request");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        self.record_rate_limit(response.headers());
        Ok(response)
    }

    fn record_rate_limit(&self, headers: &HeaderMap) {
        let reset_epoch: i64 = header_value(headers, "x-ratelimit-reset");
        let snapshot = RateLimitSnapshot {
            limit: header_value(headers, "x-ratelimit-limit"),
            remaining: header_value(headers, "x-ratelimit-remaining"),
            reset: Utc.timestamp_opt(reset_epoch, 0).single().unwrap_or_default(),
        };

        if let Ok(mut slot) = self.rate_limit.write() {
            *slot = Some(snapshot);
        }
    }

    /// Interpret an alert-list response.
    ///
    /// A 403 (missing token scope) or 404 (feature disabled for the
    /// repository) is downgraded to an empty list so one repository cannot
    /// fail the whole fetch. A non-array body is also treated as empty.
    async fn read_alert_list<T>(
        &self,
        response: Response,
        repository: &str,
        category: AlertCategory,
    ) -> Result<Vec<T>, ProviderError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            warn!(
                repository = %repository,
                category = %category,
                "GitHub API returned 403; check that the token has the required scopes"
            );
            return Ok(Vec::new());
        }
        if status == StatusCode::NOT_FOUND {
            warn!(
                repository = %repository,
                category = %category,
                "GitHub API returned 404; this feature may not be enabled for the repository"
            );
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        if !payload.is_array() {
            warn!(
                repository = %repository,
                category = %category,
                "GitHub API returned a non-array alert payload"
            );
            return Ok(Vec::new());
        }
        serde_json::from_value(payload).map_err(ProviderError::Serialization)
    }

    /// Fetch open and closed code-scanning alerts for a repository.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or an unexpected API status.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn fetch_code_scanning_alerts(
        &self,
        repository: &str,
    ) -> Result<Vec<RawCodeScanningAlert>, ProviderError> {
        let response = self
            .get(&format!(
                "/repos/{repository}/code-scanning/alerts?per_page={PER_PAGE}"
            ))
            .await?;
        self.read_alert_list(response, repository, AlertCategory::CodeScanning)
            .await
    }

    /// Fetch secret-scanning alerts for a repository, restricted to the
    /// generic secret types.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or an unexpected API status.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn fetch_secret_scanning_alerts(
        &self,
        repository: &str,
    ) -> Result<Vec<RawSecretScanningAlert>, ProviderError> {
        let secret_types = GENERIC_SECRET_TYPES.join(",");
        let response = self
            .get(&format!(
                "/repos/{repository}/secret-scanning/alerts?per_page={PER_PAGE}&secret_type={secret_types}"
            ))
            .await?;
        self.read_alert_list(response, repository, AlertCategory::SecretScanning)
            .await
    }

    /// Fetch Dependabot alerts for a repository.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or an unexpected API status.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn fetch_dependabot_alerts(
        &self,
        repository: &str,
    ) -> Result<Vec<RawDependabotAlert>, ProviderError> {
        let response = self
            .get(&format!(
                "/repos/{repository}/dependabot/alerts?per_page={PER_PAGE}"
            ))
            .await?;
        self.read_alert_list(response, repository, AlertCategory::Dependabot)
            .await
    }

    /// Query the rate-limit endpoint and return the refreshed snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, an unexpected API status, or
    /// when GitHub did not report rate-limit headers.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn get_rate_limit(&self) -> Result<RateLimitSnapshot, ProviderError> {
        let response = self.get("/rate_limit").await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), "GitHub rate-limit endpoint unavailable");
        } else if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        self.last_rate_limit().ok_or_else(|| {
            ProviderError::RateLimitUnavailable(
                "GitHub did not report rate-limit headers".to_string(),
            )
        })
    }
}

/// Parse a header into its target type, defaulting on absent or malformed
/// values.
fn header_value<T: FromStr + Default>(headers: &HeaderMap, name: &str) -> T {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_client_requires_token() {
        let result = GithubClient::new("");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_client_with_token() {
        let result = GithubClient::new("ghp_test");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_code_scanning_alerts_records_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/api/code-scanning/alerts"))
            .and(header("Authorization", "Bearer ghp_test"))
            .and(header("Accept", "application/vnd.github+json"))
            .and(header("X-GitHub-Api-Version", API_VERSION))
            .and(query_param("per_page", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-limit", "5000")
                    .insert_header("x-ratelimit-remaining", "4991")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(serde_json::json!([
                        {"number": 7, "state": "open", "rule": {"id": "rs/sql-injection"}}
                    ])),
            )
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let alerts = client.fetch_code_scanning_alerts("acme/api").await.unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].number, Some(7));
        assert_eq!(alerts[0].rule.as_ref().unwrap().id.as_deref(), Some("rs/sql-injection"));

        let snapshot = client.last_rate_limit().unwrap();
        assert_eq!(snapshot.limit, 5000);
        assert_eq!(snapshot.remaining, 4991);
        assert_eq!(snapshot.reset.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[tokio::test]
    async fn test_fetch_secret_scanning_alerts_requests_generic_types() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/api/secret-scanning/alerts"))
            .and(query_param("per_page", "100"))
            .and(query_param("secret_type", GENERIC_SECRET_TYPES.join(",")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"number": 3, "state": "resolved", "secret_type": "password"}
            ])))
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let alerts = client.fetch_secret_scanning_alerts("acme/api").await.unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].secret_type.as_deref(), Some("password"));
    }

    #[tokio::test]
    async fn test_forbidden_downgrades_to_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/api/dependabot/alerts"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let alerts = client.fetch_dependabot_alerts("acme/api").await.unwrap();

        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_downgrades_to_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/api/code-scanning/alerts"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let alerts = client.fetch_code_scanning_alerts("acme/api").await.unwrap();

        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/api/code-scanning/alerts"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let result = client.fetch_code_scanning_alerts("acme/api").await;

        match result {
            Err(ProviderError::Api { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_array_payload_downgrades_to_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/api/dependabot/alerts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Moved Permanently"})),
            )
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let alerts = client.fetch_dependabot_alerts("acme/api").await.unwrap();

        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_get_rate_limit_returns_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-limit", "5000")
                    .insert_header("x-ratelimit-remaining", "42")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(serde_json::json!({"resources": {}})),
            )
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let snapshot = client.get_rate_limit().await.unwrap();

        assert_eq!(snapshot.limit, 5000);
        assert_eq!(snapshot.remaining, 42);
    }

    #[tokio::test]
    async fn test_missing_rate_limit_headers_default_to_zero() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = GithubClient::with_base_url("ghp_test", mock_server.uri()).unwrap();
        let snapshot = client.get_rate_limit().await.unwrap();

        assert_eq!(snapshot.limit, 0);
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(snapshot.reset.timestamp(), 0);
    }
}
