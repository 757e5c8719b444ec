//! The analyzer service.
//!
//! [`AnalyzerService`] is the single entry point consumers use: it validates
//! input, runs the fetch and scoring backend, derives the verdict, records
//! the result in history and notifies subscribers.
//!
//! # Cancellation
//!
//! The backend stage runs in a spawned task. A caller that drops the
//! `analyze` future stops waiting but does not cancel the task, so the
//! history write still happens exactly once if scoring succeeds.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::SubsecRound;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{HistoryEvent, EVENT_CHANNEL_CAPACITY};
use crate::contract::{
    summarize, validate_assessment, validate_input, validate_result, validate_summary,
    AnalysisRecord, AnalysisRequest, AnalysisResult, AnalysisSummary, Document, ValidatedInput,
};
use crate::error::{AnalysisError, StorageError};
use crate::fetch::PassthroughFetcher;
use crate::history::InMemoryHistory;
use crate::traits::{ArticleFetcher, HistoryStore, RealTimeProvider, ScoringProvider, TimeProvider};

/// Default number of entries returned by [`AnalyzerService::list_recent_analyses`].
pub const DEFAULT_RECENT_LIMIT: usize = 3;

/// Default deadline for the backend stage of an analysis.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;

/// Everything the spawned backend task needs.
#[derive(Clone)]
struct Pipeline {
    provider: Arc<dyn ScoringProvider>,
    fetcher: Arc<dyn ArticleFetcher>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn TimeProvider>,
    events: broadcast::Sender<HistoryEvent>,
    timeout: Duration,
}

impl Pipeline {
    async fn run(self, input: ValidatedInput) -> Result<AnalysisResult, AnalysisError> {
        let start = Instant::now();
        let input_type = input.input_type();

        let (document, assessment) = tokio::time::timeout(self.timeout, self.score(input))
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    provider = self.provider.name(),
                    "Analysis backend timed out"
                );
                AnalysisError::unavailable(format!(
                    "analysis did not complete within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        validate_assessment(&assessment).map_err(|violation| {
            tracing::error!(
                provider = self.provider.name(),
                field = %violation.field,
                reason = %violation.reason,
                "Provider returned an invalid assessment"
            );
            AnalysisError::from(violation)
        })?;

        let result = AnalysisResult::from_assessment(assessment);
        validate_result(&result)?;

        let summary = summarize(
            Uuid::new_v4().to_string(),
            self.clock.now().trunc_subsecs(6),
            &document,
            &result,
        );
        validate_summary(&summary)?;

        let record = AnalysisRecord {
            summary: summary.clone(),
            result: result.clone(),
        };
        self.history.append(&record).await.map_err(|e| {
            tracing::error!(error = %e, id = %summary.id, "Failed to record analysis");
            AnalysisError::from(e)
        })?;

        tracing::info!(
            id = %summary.id,
            input_type = %input_type,
            provider = self.provider.name(),
            score = result.score,
            verdict = %result.verdict,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Analysis recorded"
        );

        // no subscribers is fine
        let _ = self.events.send(HistoryEvent::Recorded { summary });

        Ok(result)
    }

    async fn score(
        &self,
        input: ValidatedInput,
    ) -> Result<(Document, crate::contract::Assessment), AnalysisError> {
        let document = match input {
            ValidatedInput::Text(text) => Document::from_text(text),
            ValidatedInput::Url(url) => self.fetcher.fetch(&url).await?,
        };
        let assessment = self.provider.assess(&document).await?;
        Ok((document, assessment))
    }
}

/// News credibility analyzer.
///
/// Cheap to share behind an [`Arc`]; every method takes `&self` and is safe
/// to call concurrently.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use credibility_analyzer::contract::{AnalysisRequest, InputType, Verdict};
/// use credibility_analyzer::providers::FixtureProvider;
/// use credibility_analyzer::service::AnalyzerService;
///
/// # tokio_test::block_on(async {
/// let service = AnalyzerService::new(Arc::new(FixtureProvider::new()));
/// let result = service
///     .analyze(AnalysisRequest::new("A shocking miracle cure", InputType::Text))
///     .await
///     .unwrap();
/// assert_eq!(result.verdict, Verdict::LikelyFake);
/// assert_eq!(service.list_history().await.unwrap().len(), 1);
/// # });
/// ```
pub struct AnalyzerService {
    pipeline: Pipeline,
    recent_limit: usize,
}

impl AnalyzerService {
    /// Service over `provider` with in-memory history, passthrough URL
    /// fetching and default limits.
    #[must_use]
    pub fn new(provider: Arc<dyn ScoringProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            pipeline: Pipeline {
                provider,
                fetcher: Arc::new(PassthroughFetcher),
                history: Arc::new(InMemoryHistory::new()),
                clock: Arc::new(RealTimeProvider),
                events,
                timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            },
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Use `fetcher` for URL submissions.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ArticleFetcher>) -> Self {
        self.pipeline.fetcher = fetcher;
        self
    }

    /// Use `history` as the history store.
    #[must_use]
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.pipeline.history = history;
        self
    }

    /// Use `clock` for summary dates.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.pipeline.clock = clock;
        self
    }

    /// Set the number of entries returned by [`Self::list_recent_analyses`].
    #[must_use]
    pub const fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    /// Set the deadline for the backend stage.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline.timeout = timeout;
        self
    }

    /// Configured recent-list length.
    #[must_use]
    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Name of the configured scoring provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.pipeline.provider.name()
    }

    /// Analyze a URL or text and record the result.
    ///
    /// On success exactly one summary is appended to history. On failure
    /// history is unchanged.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Validation`] for empty, oversized or malformed input;
    ///   the backend is not contacted
    /// - [`AnalysisError::UnsupportedContent`] when the content cannot be analyzed
    /// - [`AnalysisError::Unavailable`] on backend failure or timeout
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let input = validate_input(&request.input, request.input_type).map_err(|e| {
            tracing::debug!(input_type = %request.input_type, error = %e, "Rejected analysis request");
            e
        })?;

        let pipeline = self.pipeline.clone();
        tokio::spawn(pipeline.run(input)).await.map_err(|e| {
            tracing::error!(error = %e, "Analysis task failed");
            AnalysisError::unavailable(format!("analysis task failed: {e}"))
        })?
    }

    /// The newest entries, at most the configured recent limit.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unavailable`] if the history store fails.
    pub async fn list_recent_analyses(&self) -> Result<Vec<AnalysisSummary>, AnalysisError> {
        self.pipeline
            .history
            .recent(self.recent_limit)
            .await
            .map_err(log_storage_error)
    }

    /// Every entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unavailable`] if the history store fails.
    pub async fn list_history(&self) -> Result<Vec<AnalysisSummary>, AnalysisError> {
        self.pipeline
            .history
            .list()
            .await
            .map_err(log_storage_error)
    }

    /// The full result recorded under `id`, if it is still in history.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unavailable`] if the history store fails.
    pub async fn get_analysis(&self, id: &str) -> Result<Option<AnalysisResult>, AnalysisError> {
        Ok(self
            .pipeline
            .history
            .get(id)
            .await
            .map_err(log_storage_error)?
            .map(|record| record.result))
    }

    /// Remove every entry. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unavailable`] if the history store fails.
    pub async fn clear_history(&self) -> Result<(), AnalysisError> {
        let removed = self
            .pipeline
            .history
            .clear()
            .await
            .map_err(log_storage_error)?;
        tracing::info!(removed, "History cleared");
        let _ = self.pipeline.events.send(HistoryEvent::Cleared { removed });
        Ok(())
    }

    /// Receive history events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.pipeline.events.subscribe()
    }

    /// Check that the history store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unavailable`] if it is not.
    pub async fn check_history(&self) -> Result<(), AnalysisError> {
        self.pipeline.history.ping().await.map_err(log_storage_error)
    }
}

impl std::fmt::Debug for AnalyzerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerService")
            .field("provider", &self.pipeline.provider.name())
            .field("recent_limit", &self.recent_limit)
            .field("timeout", &self.pipeline.timeout)
            .finish_non_exhaustive()
    }
}

fn log_storage_error(err: StorageError) -> AnalysisError {
    tracing::error!(error = %err, "History store failed");
    AnalysisError::from(err)
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
    use crate::contract::{InputType, Verdict};
    use crate::error::ErrorKind;
    use crate::providers::FixtureProvider;
    use crate::test_utils::{assessment_with_score, frozen_clock};
    use crate::traits::{MockArticleFetcher, MockHistoryStore, MockScoringProvider};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl ScoringProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn assess(
            &self,
            _document: &Document,
        ) -> Result<crate::contract::Assessment, AnalysisError> {
            tokio::time::sleep(self.delay).await;
            Ok(assessment_with_score(0.7))
        }
    }

    fn never_called_provider() -> MockScoringProvider {
        let mut mock = MockScoringProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_assess().times(0);
        mock
    }

    #[tokio::test]
    async fn test_analyze_text_records_summary() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let service = AnalyzerService::new(Arc::new(FixtureProvider::new()))
            .with_clock(Arc::new(frozen_clock(at)));

        let result = service
            .analyze(AnalysisRequest::new(
                "New research from the university science department",
                InputType::Text,
            ))
            .await
            .unwrap();
        assert_eq!(result.verdict, Verdict::LikelyCredible);

        let history = service.list_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, at);
        assert_eq!(history[0].score, result.score);
        assert_eq!(history[0].url, None);
        assert!(history[0].text_snippet.is_some());
        assert_eq!(
            service.get_analysis(&history[0].id).await.unwrap(),
            Some(result)
        );
    }

    #[tokio::test]
    async fn test_validation_never_reaches_backend() {
        let service = AnalyzerService::new(Arc::new(never_called_provider()));
        for (input, input_type) in [
            ("", InputType::Text),
            ("   ", InputType::Url),
            ("not a url", InputType::Url),
        ] {
            let err = service
                .analyze(AnalysisRequest::new(input, input_type))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationError);
        }
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetcher_error_leaves_history_unchanged() {
        let mut fetcher = MockArticleFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(AnalysisError::unsupported("paywalled")));
        let service = AnalyzerService::new(Arc::new(never_called_provider()))
            .with_fetcher(Arc::new(fetcher));

        let err = service
            .analyze(AnalysisRequest::new("https://example.com/paywall", InputType::Url))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedContent);
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_assessment_is_unavailable() {
        let mut provider = MockScoringProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_assess()
            .returning(|_| Ok(assessment_with_score(1.5)));
        let service = AnalyzerService::new(Arc::new(provider));

        let err = service
            .analyze(AnalysisRequest::new("text", InputType::Text))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AnalysisUnavailable);
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_failure_is_unavailable() {
        let mut history = MockHistoryStore::new();
        history.expect_append().returning(|_| {
            Err(StorageError::ConnectionFailed {
                message: "disk full".to_string(),
            })
        });
        let service = AnalyzerService::new(Arc::new(FixtureProvider::new()))
            .with_history(Arc::new(history));

        let err = service
            .analyze(AnalysisRequest::new("text", InputType::Text))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable_and_not_recorded() {
        let service = AnalyzerService::new(Arc::new(SlowProvider {
            delay: Duration::from_secs(5),
        }))
        .with_request_timeout(Duration::from_millis(50));

        let err = service
            .analyze(AnalysisRequest::new("text", InputType::Text))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AnalysisUnavailable);
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_call_still_records() {
        let service = AnalyzerService::new(Arc::new(SlowProvider {
            delay: Duration::from_millis(100),
        }));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            service.analyze(AnalysisRequest::new("text", InputType::Text)),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(service.list_history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_events_for_record_and_clear() {
        let service = AnalyzerService::new(Arc::new(FixtureProvider::new()));
        let mut events = service.subscribe();

        service
            .analyze(AnalysisRequest::new("plain text", InputType::Text))
            .await
            .unwrap();
        service.clear_history().await.unwrap();

        match events.recv().await.unwrap() {
            HistoryEvent::Recorded { summary } => assert_eq!(summary.title, "plain text"),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            events.recv().await.unwrap(),
            HistoryEvent::Cleared { removed: 1 }
        );
    }

    #[tokio::test]
    async fn test_recent_limit_applies() {
        let service =
            AnalyzerService::new(Arc::new(FixtureProvider::new())).with_recent_limit(2);
        for i in 0..4 {
            service
                .analyze(AnalysisRequest::new(format!("story {i}"), InputType::Text))
                .await
                .unwrap();
        }
        let recent = service.list_recent_analyses().await.unwrap();
        let history = service.list_history().await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent, history[..2].to_vec());
        assert_eq!(service.recent_limit(), 2);
    }

    #[tokio::test]
    async fn test_clear_history_idempotent() {
        let service = AnalyzerService::new(Arc::new(FixtureProvider::new()));
        service
            .analyze(AnalysisRequest::new("story", InputType::Text))
            .await
            .unwrap();
        service.clear_history().await.unwrap();
        service.clear_history().await.unwrap();
        assert!(service.list_history().await.unwrap().is_empty());
        assert!(service.check_history().await.is_ok());
    }
}
