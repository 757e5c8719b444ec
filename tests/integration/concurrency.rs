//! Concurrent analyze calls.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;

use credibility_analyzer::contract::{AnalysisRequest, InputType};
use credibility_analyzer::history::SqliteHistory;
use credibility_analyzer::providers::{FixtureProvider, HeuristicProvider};
use credibility_analyzer::service::AnalyzerService;
use futures_util::future::join_all;
use tempfile::TempDir;

const K: usize = 64;

async fn run_concurrently(service: Arc<AnalyzerService>, k: usize) {
    let tasks = (0..k).map(|i| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .analyze(AnalysisRequest::new(
                    format!("Concurrent report number {i}"),
                    InputType::Text,
                ))
                .await
        })
    });

    for joined in join_all(tasks).await {
        joined.expect("task panicked").expect("analysis failed");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_k_concurrent_analyses_in_memory() {
    let service = Arc::new(AnalyzerService::new(Arc::new(FixtureProvider::new())));

    run_concurrently(Arc::clone(&service), K).await;

    let history = service.list_history().await.unwrap();
    assert_eq!(history.len(), K);
    let ids: HashSet<_> = history.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), K);
    assert!(history.windows(2).all(|w| w[0].date >= w[1].date));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_k_concurrent_analyses_sqlite() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = SqliteHistory::new(dir.path().join("history.db"))
        .await
        .expect("Failed to create history");
    let service = Arc::new(
        AnalyzerService::new(Arc::new(HeuristicProvider::new())).with_history(Arc::new(history)),
    );

    run_concurrently(Arc::clone(&service), K).await;

    let history = service.list_history().await.unwrap();
    assert_eq!(history.len(), K);
    let ids: HashSet<_> = history.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), K);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_partial_entries() {
    let service = Arc::new(AnalyzerService::new(Arc::new(FixtureProvider::new())));

    let writer = tokio::spawn(run_concurrently(Arc::clone(&service), K));

    let reader_service = Arc::clone(&service);
    let reader = tokio::spawn(async move {
        let mut last_len = 0;
        while last_len < K {
            let history = reader_service.list_history().await.unwrap();
            assert!(history.len() >= last_len, "history shrank");
            for summary in &history {
                assert!(!summary.id.is_empty());
                assert!((0.0..=1.0).contains(&summary.score));
                assert!(summary.text_snippet.is_some());
            }
            last_len = history.len();
            tokio::task::yield_now().await;
        }
    });

    writer.await.unwrap();
    reader.await.unwrap();
    assert_eq!(service.list_history().await.unwrap().len(), K);
}
