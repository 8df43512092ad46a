//! GitHub alert provider: cached, concurrent fan-out across repositories.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info, instrument};

use super::client::GithubClient;
use super::{mapper, PROVIDER};
use crate::cache::TtlCache;
use crate::kpi::KpiSummary;
use crate::model::{AlertCategory, SecurityAlert};
use crate::providers::{
    AlertProvider, FetchedAlerts, HealthStatus, ProviderError, ProviderHealth,
};

/// When fewer requests than this remain in the rate-limit window, cache
/// lifetimes are extended instead of letting entries expire on schedule.
const RATE_LIMIT_LOW_WATER: u64 = 100;

/// Alert provider backed by the GitHub REST API.
///
/// Each (repository, category) slice is fetched concurrently, mapped to the
/// canonical model, and cached under its own key. A failed slice is logged
/// and skipped so the remaining slices still produce a result.
pub struct GithubAlertProvider {
    client: GithubClient,
    cache: TtlCache<Vec<SecurityAlert>>,
    cache_ttl: Duration,
}

/// Result of fetching one (repository, category) slice.
struct SliceOutcome {
    alerts: Vec<SecurityAlert>,
    /// Cache key written by this call, `None` on a cache hit.
    written_key: Option<String>,
}

fn cache_key(repository: &str, category: AlertCategory) -> String {
    format!("{PROVIDER}:{repository}:{}", category.as_str())
}

impl GithubAlertProvider {
    /// Create a new provider with the given cache lifetime.
    pub fn new(client: GithubClient, cache_ttl: Duration) -> Self {
        Self {
            client,
            cache: TtlCache::new(),
            cache_ttl,
        }
    }

    async fn fetch_slice(
        &self,
        repository: &str,
        category: AlertCategory,
        skip_cache: bool,
    ) -> Result<SliceOutcome, ProviderError> {
        let key = cache_key(repository, category);
        if !skip_cache {
            if let Some(alerts) = self.cache.get(&key) {
                debug!(key = %key, "Alert cache hit");
                return Ok(SliceOutcome {
                    alerts,
                    written_key: None,
                });
            }
        }

        let alerts: Vec<SecurityAlert> = match category {
            AlertCategory::CodeScanning => self
                .client
                .fetch_code_scanning_alerts(repository)
                .await?
                .into_iter()
                .map(|raw| mapper::map_code_scanning_alert(repository, raw))
                .collect(),
            AlertCategory::SecretScanning => self
                .client
                .fetch_secret_scanning_alerts(repository)
                .await?
                .into_iter()
                .map(|raw| mapper::map_secret_scanning_alert(repository, raw))
                .collect(),
            AlertCategory::Dependabot => self
                .client
                .fetch_dependabot_alerts(repository)
                .await?
                .into_iter()
                .map(|raw| mapper::map_dependabot_alert(repository, raw))
                .collect(),
        };

        // Empty slices are cached too: a repository with no alerts should
        // not be re-fetched on every request.
        self.cache.set(key.clone(), alerts.clone(), self.cache_ttl);
        Ok(SliceOutcome {
            alerts,
            written_key: Some(key),
        })
    }
}

#[async_trait]
impl AlertProvider for GithubAlertProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(
        skip(self, repositories),
        fields(provider = PROVIDER, repository_count = repositories.len())
    )]
    async fn fetch_alerts(
        &self,
        repositories: &[String],
        skip_cache: bool,
    ) -> Result<FetchedAlerts, ProviderError> {
        let mut labels = Vec::new();
        let mut tasks = Vec::new();
        for repository in repositories {
            for category in AlertCategory::ALL {
                labels.push((repository.as_str(), category));
                tasks.push(self.fetch_slice(repository, category, skip_cache));
            }
        }

        let mut alerts = Vec::new();
        let mut written_keys = Vec::new();
        for ((repository, category), outcome) in labels.into_iter().zip(join_all(tasks).await) {
            match outcome {
                Ok(outcome) => {
                    alerts.extend(outcome.alerts);
                    if let Some(key) = outcome.written_key {
                        written_keys.push(key);
                    }
                }
                Err(error) => {
                    error!(
                        repository = %repository,
                        category = %category,
                        error = %error,
                        "Failed to fetch alert slice"
                    );
                }
            }
        }

        if let Some(snapshot) = self.client.last_rate_limit() {
            if snapshot.remaining < RATE_LIMIT_LOW_WATER {
                info!(
                    remaining = snapshot.remaining,
                    "GitHub rate limit low; extending cache lifetimes"
                );
                for key in &written_keys {
                    self.cache.extend_ttl(key, self.cache_ttl);
                }
            }
        }

        let kpi = KpiSummary::compute(&alerts);
        Ok(FetchedAlerts {
            alerts,
            kpi,
            fetched_at: Utc::now(),
        })
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn health_check(&self) -> ProviderHealth {
        match self.client.get_rate_limit().await {
            Ok(snapshot) => ProviderHealth {
                status: HealthStatus::Ok,
                provider: PROVIDER.to_string(),
                rate_limit: Some(snapshot),
                error: None,
            },
            Err(error) => ProviderHealth {
                status: HealthStatus::Error,
                provider: PROVIDER.to_string(),
                rate_limit: None,
                error: Some(error.to_string()),
            },
        }
    }
}
