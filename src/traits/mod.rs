//! Trait definitions for pluggable and mockable dependencies.
//!
//! This module defines traits for:
//! - [`ScoringProvider`]: The backend that scores a document
//! - [`ArticleFetcher`]: Turns a submitted URL into a document
//! - [`HistoryStore`]: Append-only analysis history
//! - [`AnthropicClientTrait`]: Language-model API client abstraction
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use credibility_analyzer::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Role, Usage};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use crate::contract::{AnalysisRecord, AnalysisSummary, Assessment, Document};
use crate::error::{AnalysisError, AnthropicError, StorageError};

/// Scoring backend.
///
/// Implementations are stateless with respect to the caller and safe to
/// share across concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoringProvider: Send + Sync {
    /// Short identifier used in logs, e.g. `fixture`.
    fn name(&self) -> &'static str;

    /// Score a document.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnsupportedContent`] when the document
    /// cannot be analyzed and [`AnalysisError::Unavailable`] when the
    /// backend fails.
    async fn assess(&self, document: &Document) -> Result<Assessment, AnalysisError>;
}

/// Resolves a submitted URL into article content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetch the document behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnsupportedContent`] for content that cannot
    /// be analyzed and [`AnalysisError::Unavailable`] for transient failures.
    async fn fetch(&self, url: &Url) -> Result<Document, AnalysisError>;
}

/// Append-only analysis history.
///
/// Lists are ordered by date descending; entries with equal dates are
/// ordered by append order, later first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    async fn append(&self, record: &AnalysisRecord) -> Result<(), StorageError>;

    /// All summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails.
    async fn list(&self) -> Result<Vec<AnalysisSummary>, StorageError>;

    /// The newest `limit` summaries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails.
    async fn recent(&self, limit: usize) -> Result<Vec<AnalysisSummary>, StorageError>;

    /// A single record by summary id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails.
    async fn get(&self, id: &str) -> Result<Option<AnalysisRecord>, StorageError>;

    /// Remove every record, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    async fn clear(&self) -> Result<u64, StorageError>;

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if it is not.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Anthropic API client trait for mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnthropicClientTrait: Send + Sync {
    /// Send a completion request to the API.
    ///
    /// # Errors
    ///
    /// Returns [`AnthropicError`] if the API call fails.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AnthropicError>;
}

/// Time provider trait for deterministic testing.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::contract::{CategoryScore, InputType};
    use static_assertions::assert_impl_all;

    assert_impl_all!(RealTimeProvider: Send, Sync, Clone, Copy, Default);

    #[test]
    fn test_real_time_provider_now() {
        let provider = RealTimeProvider;
        let before = Utc::now();
        let now = provider.now();
        let after = Utc::now();
        assert!(now >= before);
        assert!(now <= after);
    }

    #[tokio::test]
    async fn test_mock_scoring_provider() {
        let mut mock = MockScoringProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_assess().returning(|doc| {
            assert_eq!(doc.input_type, InputType::Text);
            Ok(Assessment {
                score: 0.4,
                confidence: 0.9,
                categories: vec![CategoryScore::new("Bias", 0.4)],
                explanation: "fine".to_string(),
                sources: vec![],
                suggestions: vec![],
            })
        });

        assert_eq!(mock.name(), "mock");
        let assessment = mock.assess(&Document::from_text("text")).await.unwrap();
        assert_eq!(assessment.score, 0.4);
    }

    #[tokio::test]
    async fn test_mock_fetcher_error() {
        let mut mock = MockArticleFetcher::new();
        mock.expect_fetch()
            .returning(|_| Err(AnalysisError::unsupported("paywalled")));

        let url = Url::parse("https://example.com/paywall").unwrap();
        let err = mock.fetch(&url).await.unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedContent { .. }));
    }

    #[tokio::test]
    async fn test_mock_history_get_not_found() {
        let mut mock = MockHistoryStore::new();
        mock.expect_get()
            .with(mockall::predicate::eq("missing"))
            .returning(|_| Ok(None));

        assert!(mock.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_history_error() {
        let mut mock = MockHistoryStore::new();
        mock.expect_list().returning(|| {
            Err(StorageError::ConnectionFailed {
                message: "Test error".to_string(),
            })
        });

        let result = mock.list().await;
        assert!(matches!(result, Err(StorageError::ConnectionFailed { .. })));
    }

    #[tokio::test]
    async fn test_mock_anthropic_client() {
        let mut mock = MockAnthropicClientTrait::new();
        mock.expect_complete().returning(|_msgs, _config| {
            Ok(CompletionResponse::new("{}", Usage::new(10, 20)))
        });

        let response = mock
            .complete(vec![Message::user("Test")], CompletionConfig::new())
            .await
            .unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.usage.total(), 30);
    }

    #[test]
    fn test_mock_time_provider_sequence() {
        let time1 = Utc::now();
        let time2 = time1 + chrono::Duration::hours(1);

        let mut mock = MockTimeProvider::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(time1);
        mock.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(time2);

        assert_eq!(mock.now(), time1);
        assert_eq!(mock.now(), time2);
    }
}
