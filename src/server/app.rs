//! Wiring from [`Config`] to a running server.

use std::sync::Arc;
use std::time::Duration;

use super::{AppState, HttpTransport, TransportConfig};
use crate::anthropic::{AnthropicClient, ClientConfig};
use crate::config::{Config, FetcherKind, ProviderKind};
use crate::error::{AppError, ConfigError};
use crate::fetch::{HttpArticleFetcher, PassthroughFetcher};
use crate::history::{InMemoryHistory, SqliteHistory};
use crate::providers::{FixtureProvider, HeuristicProvider, LlmProvider};
use crate::service::AnalyzerService;
use crate::traits::{ArticleFetcher, HistoryStore, ScoringProvider};

/// The credibility analyzer HTTP server.
#[derive(Debug)]
pub struct AnalyzerServer {
    config: Config,
}

impl AnalyzerServer {
    /// Create a server from configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the analyzer service described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the Anthropic client, HTTP fetcher or history
    /// database cannot be created.
    pub async fn build_service(&self) -> Result<AnalyzerService, AppError> {
        let config = &self.config;

        let provider = build_provider(config)?;
        let fetcher: Arc<dyn ArticleFetcher> = match config.fetcher {
            FetcherKind::Passthrough => Arc::new(PassthroughFetcher),
            FetcherKind::Http => Arc::new(HttpArticleFetcher::new(config.fetch_timeout_ms)?),
        };
        let history: Arc<dyn HistoryStore> = match &config.database_path {
            Some(path) => Arc::new(SqliteHistory::new(path).await?),
            None => Arc::new(InMemoryHistory::new()),
        };

        tracing::info!(
            provider = provider.name(),
            fetcher = ?config.fetcher,
            persistent_history = config.database_path.is_some(),
            recent_limit = config.recent_limit,
            request_timeout_ms = config.request_timeout_ms,
            "Analyzer service configured"
        );

        Ok(AnalyzerService::new(provider)
            .with_fetcher(fetcher)
            .with_history(history)
            .with_recent_limit(config.recent_limit)
            .with_request_timeout(Duration::from_millis(config.request_timeout_ms)))
    }

    /// Build the service and serve it until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if wiring fails or the server cannot run.
    pub async fn run(self) -> Result<(), AppError> {
        let service = self.build_service().await?;
        HttpTransport::with_config(TransportConfig {
            bind_addr: self.config.bind_addr.clone(),
            ..TransportConfig::default()
        })
        .serve(AppState::new(service))
        .await
    }
}

fn build_provider(config: &Config) -> Result<Arc<dyn ScoringProvider>, AppError> {
    Ok(match config.provider {
        ProviderKind::Fixture => Arc::new(FixtureProvider::new()),
        ProviderKind::Heuristic => Arc::new(HeuristicProvider::new()),
        ProviderKind::Anthropic => {
            let api_key = config
                .api_key
                .as_ref()
                .ok_or_else(|| ConfigError::MissingRequired {
                    var: "ANTHROPIC_API_KEY".into(),
                })?;
            let client = AnthropicClient::new(api_key.expose(), client_config(config))?;
            Arc::new(LlmProvider::new(client))
        }
    })
}

/// Anthropic client settings. Every attempt gets an equal share of the
/// request deadline so retries can still run inside it.
fn client_config(config: &Config) -> ClientConfig {
    let attempts = u64::from(config.max_retries) + 1;
    ClientConfig::default()
        .with_model(config.model.clone())
        .with_timeout_ms((config.request_timeout_ms / attempts).max(1))
        .with_max_retries(config.max_retries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SecretString;

    #[tokio::test]
    async fn test_default_config_builds_fixture_service() {
        let server = AnalyzerServer::new(Config::default());
        let service = server.build_service().await.unwrap();
        assert_eq!(service.provider_name(), "fixture");
        assert_eq!(service.recent_limit(), 3);
    }

    #[tokio::test]
    async fn test_heuristic_with_sqlite_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            provider: ProviderKind::Heuristic,
            fetcher: FetcherKind::Http,
            database_path: Some(dir.path().join("history.db")),
            recent_limit: 5,
            ..Config::default()
        };
        let service = AnalyzerServer::new(config).build_service().await.unwrap();
        assert_eq!(service.provider_name(), "heuristic");
        assert_eq!(service.recent_limit(), 5);
        assert!(service.check_history().await.is_ok());
    }

    #[tokio::test]
    async fn test_anthropic_provider_selected() {
        let config = Config {
            provider: ProviderKind::Anthropic,
            api_key: Some(SecretString::new("sk-ant-test")),
            ..Config::default()
        };
        let service = AnalyzerServer::new(config).build_service().await.unwrap();
        assert_eq!(service.provider_name(), "anthropic");
    }

    #[test]
    fn test_client_attempts_share_request_deadline() {
        let config = Config {
            request_timeout_ms: 20_000,
            max_retries: 3,
            ..Config::default()
        };
        let client = client_config(&config);
        assert_eq!(client.timeout_ms, 5_000);
        assert!(client.timeout_ms * u64::from(client.max_retries + 1) <= config.request_timeout_ms);

        let single = client_config(&Config {
            max_retries: 0,
            ..config
        });
        assert_eq!(single.timeout_ms, 20_000);
    }

    #[test]
    fn test_anthropic_without_key_fails() {
        let config = Config {
            provider: ProviderKind::Anthropic,
            api_key: None,
            ..Config::default()
        };
        let err = build_provider(&config).err().unwrap();
        assert!(matches!(err, AppError::Config(ConfigError::MissingRequired { .. })));
    }
}
