//! HTTP API for the security-alert dashboard.
//!
//! Provides REST API endpoints for:
//! - Aggregated alerts with KPI rollups
//! - Provider health and rate-limit status

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

use secdash_alerts::providers::{AlertProvider, ProviderHealth};
use secdash_alerts::{Config, KpiSummary, SecurityAlert};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration
    pub config: Config,
    /// Alert provider
    pub provider: Arc<dyn AlertProvider>,
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/alerts", get(alerts_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Query parameters for the alerts endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AlertsQuery {
    /// Bypass the alert cache when set to `"true"`.
    nocache: Option<String>,
    /// Comma-separated subset of the configured repositories.
    repositories: Option<String>,
}

/// Aggregated alerts response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertsResponse {
    alerts: Vec<SecurityAlert>,
    kpi: KpiSummary,
    fetched_at: DateTime<Utc>,
    /// Every configured repository, regardless of any requested subset.
    repositories: Vec<String>,
}

/// Error payload returned on a failed fetch.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Provider health plus the configured repository list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    #[serde(flatten)]
    health: ProviderHealth,
    configured_repos: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Aggregated alerts handler.
async fn alerts_handler(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> impl IntoResponse {
    let skip_cache = query.nocache.as_deref() == Some("true");
    let repositories =
        filter_repositories(query.repositories.as_deref(), &state.config.repositories);

    match state.provider.fetch_alerts(&repositories, skip_cache).await {
        Ok(fetched) => (
            StatusCode::OK,
            Json(AlertsResponse {
                alerts: fetched.alerts,
                kpi: fetched.kpi,
                fetched_at: fetched.fetched_at,
                repositories: state.config.repositories.clone(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to fetch alerts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Provider health handler. Always answers 200; an unreachable upstream is
/// reported in the body instead.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.provider.health_check().await;
    Json(HealthResponse {
        health,
        configured_repos: state.config.repositories.clone(),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Restrict a requested repository list to the configured set.
///
/// Entries must match a configured `owner/name` slug exactly; unknown
/// entries are dropped. Absent or empty input selects every configured
/// repository.
fn filter_repositories(requested: Option<&str>, configured: &[String]) -> Vec<String> {
    match requested.filter(|list| !list.is_empty()) {
        Some(list) => list
            .split(',')
            .filter(|candidate| configured.iter().any(|repo| repo == candidate))
            .map(ToString::to_string)
            .collect(),
        None => configured.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use secdash_alerts::providers::{FetchedAlerts, ProviderError};
    use secdash_alerts::{GithubAlertProvider, GithubClient};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn configured(repositories: &[&str]) -> Vec<String> {
        repositories.iter().map(ToString::to_string).collect()
    }

    fn state_for(server: &MockServer, repositories: &[&str]) -> AppState {
        let client = GithubClient::with_base_url("ghp_test", server.uri()).unwrap();
        let provider = GithubAlertProvider::new(client, Duration::from_secs(300));
        AppState {
            config: Config {
                github_token: "ghp_test".to_string(),
                repositories: configured(repositories),
                cache_ttl: Duration::from_secs(300),
                port: 8080,
            },
            provider: Arc::new(provider),
        }
    }

    async fn mount_empty_endpoints(server: &MockServer, repository: &str, expected_calls: u64) {
        for endpoint in ["code-scanning", "secret-scanning", "dependabot"] {
            Mock::given(method("GET"))
                .and(path(format!("/repos/{repository}/{endpoint}/alerts")))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
                .expect(expected_calls)
                .mount(server)
                .await;
        }
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_filter_repositories_defaults_to_configured() {
        let configured = configured(&["acme/api", "acme/web"]);
        assert_eq!(filter_repositories(None, &configured), configured);
    }

    #[test]
    fn test_filter_repositories_requires_exact_match() {
        let configured = configured(&["acme/api", "acme/web"]);
        // " acme/web" does not match: entries are not trimmed.
        let filtered = filter_repositories(Some("acme/api,acme/unknown, acme/web"), &configured);
        assert_eq!(filtered, vec!["acme/api".to_string()]);
    }

    #[test]
    fn test_filter_repositories_empty_param_selects_all() {
        let configured = configured(&["acme/api", "acme/web"]);
        // An empty param behaves like an absent one
        assert_eq!(filter_repositories(Some(""), &configured), configured);
    }

    #[tokio::test]
    async fn test_alerts_endpoint_returns_aggregate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/api/code-scanning/alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "number": 1,
                "state": "open",
                "created_at": "2024-01-01T00:00:00Z",
                "rule": {"id": "rs/sql-injection", "security_severity_level": "high"}
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/api/secret-scanning/alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/api/dependabot/alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let state = state_for(&server, &["acme/api", "acme/web"]);
        let response = alerts_handler(
            State(state),
            Query(AlertsQuery {
                nocache: None,
                repositories: Some("acme/api".to_string()),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["alerts"].as_array().unwrap().len(), 1);
        assert_eq!(body["alerts"][0]["id"], "github:acme/api:code_scanning:1");
        assert_eq!(body["kpi"]["totalOpen"], 1);
        assert!(body["fetchedAt"].is_string());
        // The response always lists every configured repository.
        assert_eq!(
            body["repositories"],
            serde_json::json!(["acme/api", "acme/web"])
        );
    }

    #[tokio::test]
    async fn test_alerts_endpoint_nocache_bypasses_cache() {
        let server = MockServer::start().await;
        mount_empty_endpoints(&server, "acme/api", 2).await;

        let state = state_for(&server, &["acme/api"]);
        for _ in 0..2 {
            let response = alerts_handler(
                State(state.clone()),
                Query(AlertsQuery {
                    nocache: Some("true".to_string()),
                    repositories: None,
                }),
            )
            .await
            .into_response();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_alerts_endpoint_nocache_requires_literal_true() {
        let server = MockServer::start().await;
        mount_empty_endpoints(&server, "acme/api", 1).await;

        let state = state_for(&server, &["acme/api"]);
        for value in ["1", "TRUE"] {
            let response = alerts_handler(
                State(state.clone()),
                Query(AlertsQuery {
                    nocache: Some(value.to_string()),
                    repositories: None,
                }),
            )
            .await
            .into_response();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl AlertProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_alerts(
            &self,
            _repositories: &[String],
            _skip_cache: bool,
        ) -> Result<FetchedAlerts, ProviderError> {
            Err(ProviderError::Config("provider exploded".to_string()))
        }

        async fn health_check(&self) -> ProviderHealth {
            unimplemented!("not used in this test")
        }
    }

    #[tokio::test]
    async fn test_alerts_endpoint_maps_provider_failure_to_500() {
        let state = AppState {
            config: Config {
                github_token: "ghp_test".to_string(),
                repositories: configured(&["acme/api"]),
                cache_ttl: Duration::from_secs(300),
                port: 8080,
            },
            provider: Arc::new(FailingProvider),
        };

        let response = alerts_handler(State(state), Query(AlertsQuery::default()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("provider exploded"));
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_ok_with_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-limit", "5000")
                    .insert_header("x-ratelimit-remaining", "4999")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(serde_json::json!({"resources": {}})),
            )
            .mount(&server)
            .await;

        let state = state_for(&server, &["acme/api", "acme/web"]);
        let response = health_handler(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "github");
        assert_eq!(body["rateLimit"]["remaining"], 4999);
        assert_eq!(
            body["configuredRepos"],
            serde_json::json!(["acme/api", "acme/web"])
        );
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_health_endpoint_stays_200_on_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(500).set_body_string("on fire"))
            .mount(&server)
            .await;

        let state = state_for(&server, &["acme/api"]);
        let response = health_handler(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("500"));
        assert!(body.get("rateLimit").is_none());
    }
}
