//! Abandoned calls and backend timeouts.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use credibility_analyzer::contract::{AnalysisRequest, Assessment, Document, InputType};
use credibility_analyzer::error::{AnalysisError, ErrorKind};
use credibility_analyzer::providers::medium_credibility;
use credibility_analyzer::service::{AnalyzerService, HistoryEvent};
use credibility_analyzer::traits::ScoringProvider;

/// Provider that answers after a fixed delay.
struct SlowProvider {
    delay: Duration,
}

#[async_trait]
impl ScoringProvider for SlowProvider {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn assess(&self, _document: &Document) -> Result<Assessment, AnalysisError> {
        tokio::time::sleep(self.delay).await;
        Ok(medium_credibility())
    }
}

fn slow_service(delay: Duration) -> AnalyzerService {
    AnalyzerService::new(Arc::new(SlowProvider { delay }))
}

#[tokio::test]
async fn test_abandoned_call_records_exactly_once() {
    let service = slow_service(Duration::from_millis(150));
    let mut events = service.subscribe();

    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        service.analyze(AnalysisRequest::new("A report", InputType::Text)),
    )
    .await;
    assert!(abandoned.is_err(), "call should still be running");
    assert!(service.list_history().await.unwrap().is_empty());

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("analysis should finish in the background")
        .unwrap();
    assert!(matches!(event, HistoryEvent::Recorded { .. }));

    let history = service.list_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "A report");
}

#[tokio::test]
async fn test_hung_backend_times_out_as_unavailable() {
    let service = slow_service(Duration::from_secs(30))
        .with_request_timeout(Duration::from_millis(100));

    let err = service
        .analyze(AnalysisRequest::new("A report", InputType::Text))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AnalysisUnavailable);
    assert!(err.is_retryable());
    assert!(service.list_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_within_deadline_succeeds() {
    let service = slow_service(Duration::from_millis(10))
        .with_request_timeout(Duration::from_secs(5));

    let result = service
        .analyze(AnalysisRequest::new("A report", InputType::Text))
        .await
        .unwrap();
    assert_eq!(result.score, medium_credibility().score);
}
