//! The HTTP API end to end.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use credibility_analyzer::contract::{AnalysisResult, AnalysisSummary, Assessment, Document, Verdict};
use credibility_analyzer::error::AnalysisError;
use credibility_analyzer::providers::FixtureProvider;
use credibility_analyzer::server::{configure, AppState, ErrorResponse};
use credibility_analyzer::service::AnalyzerService;
use credibility_analyzer::traits::{ArticleFetcher, ScoringProvider};
use serde_json::json;
use url::Url;

/// Provider whose backend is always down.
struct DownProvider;

#[async_trait]
impl ScoringProvider for DownProvider {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn assess(&self, _document: &Document) -> Result<Assessment, AnalysisError> {
        Err(AnalysisError::unavailable("connection refused"))
    }
}

/// Fetcher that finds every page behind a paywall.
struct PaywallFetcher;

#[async_trait]
impl ArticleFetcher for PaywallFetcher {
    async fn fetch(&self, url: &Url) -> Result<Document, AnalysisError> {
        Err(AnalysisError::unsupported(format!("{url} requires a subscription")))
    }
}

fn state(service: AnalyzerService) -> web::Data<AppState> {
    web::Data::new(AppState::new(service))
}

fn fixture_state() -> web::Data<AppState> {
    state(AnalyzerService::new(Arc::new(FixtureProvider::new())))
}

#[actix_web::test]
async fn test_full_history_workflow() {
    let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;

    let inputs = [
        json!({"input": "https://example.com/science-study", "type": "url"}),
        json!({"input": "Shocking secret they don't want you to know", "type": "text"}),
        json!({"content": "An ordinary council meeting report", "type": "text"}),
        json!({"input": "New research published today", "type": "text"}),
    ];
    let mut results = Vec::new();
    for body in inputs {
        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(body)
            .to_request();
        let result: AnalysisResult = test::call_and_read_body_json(&app, req).await;
        results.push(result);
    }
    assert_eq!(results[0].verdict, Verdict::LikelyCredible);
    assert_eq!(results[1].verdict, Verdict::LikelyFake);
    assert_eq!(results[2].verdict, Verdict::PotentiallyMisleading);

    let req = test::TestRequest::get().uri("/api/analyses/history").to_request();
    let history: Vec<AnalysisSummary> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[3].score, results[0].score);
    assert!(history[3].url.is_some());

    let req = test::TestRequest::get().uri("/api/analyses/recent").to_request();
    let recent: Vec<AnalysisSummary> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recent, history[..3].to_vec());

    let req = test::TestRequest::delete().uri("/api/analyses/history").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/analyses/history").to_request();
    let history: Vec<AnalysisSummary> = test::call_and_read_body_json(&app, req).await;
    assert!(history.is_empty());
}

#[actix_web::test]
async fn test_summary_wire_shape() {
    let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .set_json(json!({"input": "Plain words", "type": "text"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/api/analyses/history").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let entry = &body[0];
    assert!(entry["id"].is_string());
    assert_eq!(entry["title"], "Plain words");
    assert!(entry["date"].as_str().unwrap().ends_with('Z'));
    assert!(entry["score"].is_number());
    assert_eq!(entry["textSnippet"], "Plain words");
    assert!(entry.get("url").is_none());
}

#[actix_web::test]
async fn test_error_statuses() {
    let app = test::init_service(
        App::new()
            .app_data(state(
                AnalyzerService::new(Arc::new(DownProvider)).with_fetcher(Arc::new(PaywallFetcher)),
            ))
            .configure(configure),
    )
    .await;

    let cases = [
        (json!({"input": "", "type": "text"}), StatusCode::BAD_REQUEST, "validation_error"),
        (
            json!({"input": "https://example.com/paid", "type": "url"}),
            StatusCode::UNPROCESSABLE_ENTITY,
            "unsupported_content",
        ),
        (
            json!({"input": "Some text", "type": "text"}),
            StatusCode::SERVICE_UNAVAILABLE,
            "analysis_unavailable",
        ),
    ];

    for (body, status, error) in cases {
        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), status);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, error);
        assert!(!body.message.is_empty());
        assert!(!body.message.contains("connection refused"));
    }

    let req = test::TestRequest::get().uri("/api/analyses/history").to_request();
    let history: Vec<AnalysisSummary> = test::call_and_read_body_json(&app, req).await;
    assert!(history.is_empty());
}

#[actix_web::test]
async fn test_missing_body_field_is_validation_error() {
    let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .set_json(json!({"type": "text"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "validation_error");
}
