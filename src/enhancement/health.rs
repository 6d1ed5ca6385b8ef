use chrono::{DateTime, Utc};
use serde::Serialize;

use super::client::RetrievalClient;
use super::types::ServiceHealth;
use crate::config::EnhancementConfig;

/// Snapshot of the enhancement service as seen by this process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatusReport {
    pub enabled: bool,
    pub api_url: String,
    pub timeout_ms: u64,
    pub max_results: u32,
    pub health: ServiceHealth,
    pub checked_at: DateTime<Utc>,
}

/// Probe the retrieval service. Reports `Disabled` without any network call
/// when enhancement is off or no client is configured.
pub async fn check_service_health(
    config: &EnhancementConfig,
    client: Option<&dyn RetrievalClient>,
) -> ServiceStatusReport {
    let health = match client {
        Some(client) if config.enabled => client.health().await,
        _ => ServiceHealth::Disabled,
    };

    if !matches!(health, ServiceHealth::Healthy | ServiceHealth::Disabled) {
        tracing::warn!(api_url = %config.api_url, health = ?health, "Retrieval service not healthy");
    }

    ServiceStatusReport {
        enabled: config.enabled,
        api_url: config.api_url.clone(),
        timeout_ms: config.timeout_ms(),
        max_results: config.max_results,
        health,
        checked_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhancement::mock::{MockReply, MockRetrievalClient};
    use crate::enhancement::types::RetrievalResponse;

    fn mock(health: ServiceHealth) -> MockRetrievalClient {
        MockRetrievalClient::always(MockReply::Respond(RetrievalResponse::default()))
            .with_health(health)
    }

    #[tokio::test]
    async fn disabled_config_skips_probe() {
        let config = EnhancementConfig {
            enabled: false,
            ..EnhancementConfig::default()
        };
        let client = mock(ServiceHealth::Healthy);
        let report = check_service_health(&config, Some(&client)).await;
        assert_eq!(report.health, ServiceHealth::Disabled);
        assert!(!report.enabled);
    }

    #[tokio::test]
    async fn missing_client_is_disabled() {
        let config = EnhancementConfig::default();
        let report = check_service_health(&config, None).await;
        assert_eq!(report.health, ServiceHealth::Disabled);
    }

    #[tokio::test]
    async fn reports_client_health() {
        let config = EnhancementConfig {
            enabled: true,
            ..EnhancementConfig::default()
        };
        let client = mock(ServiceHealth::Unhealthy { code: 503 });
        let report = check_service_health(&config, Some(&client)).await;
        assert_eq!(report.health, ServiceHealth::Unhealthy { code: 503 });
        assert_eq!(report.timeout_ms, config.timeout_ms());
        assert_eq!(report.api_url, config.api_url);
    }
}
