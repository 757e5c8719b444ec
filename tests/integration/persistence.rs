//! `SQLite` history across service restarts.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::sync::Arc;

use credibility_analyzer::contract::{AnalysisRequest, InputType};
use credibility_analyzer::history::SqliteHistory;
use credibility_analyzer::providers::FixtureProvider;
use credibility_analyzer::service::AnalyzerService;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn service_at(path: &Path) -> AnalyzerService {
    let history = SqliteHistory::new(path)
        .await
        .expect("Failed to open history");
    AnalyzerService::new(Arc::new(FixtureProvider::new())).with_history(Arc::new(history))
}

#[tokio::test]
async fn test_history_survives_restart() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("history.db");

    let (summaries, first_result) = {
        let service = service_at(&path).await;
        let first_result = service
            .analyze(AnalysisRequest::new(
                "https://example.com/shocking-claim",
                InputType::Url,
            ))
            .await
            .unwrap();
        service
            .analyze(AnalysisRequest::new("A research summary", InputType::Text))
            .await
            .unwrap();
        (service.list_history().await.unwrap(), first_result)
    };

    let reopened = service_at(&path).await;
    let restored = reopened.list_history().await.unwrap();
    assert_eq!(restored, summaries);

    let oldest = &restored[1];
    assert_eq!(
        reopened.get_analysis(&oldest.id).await.unwrap(),
        Some(first_result)
    );
}

#[tokio::test]
async fn test_clear_persists() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("history.db");

    {
        let service = service_at(&path).await;
        service
            .analyze(AnalysisRequest::new("Some report", InputType::Text))
            .await
            .unwrap();
        service.clear_history().await.unwrap();
    }

    let reopened = service_at(&path).await;
    assert!(reopened.list_history().await.unwrap().is_empty());
    assert!(reopened.list_recent_analyses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_id_is_none() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let service = service_at(&dir.path().join("history.db")).await;
    assert_eq!(service.get_analysis("no-such-id").await.unwrap(), None);
}
