//! URL submissions fetched over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use credibility_analyzer::contract::{AnalysisRequest, InputType, Verdict};
use credibility_analyzer::error::ErrorKind;
use credibility_analyzer::fetch::{HttpArticleFetcher, MAX_BODY_BYTES};
use credibility_analyzer::providers::FixtureProvider;
use credibility_analyzer::service::AnalyzerService;
use test_case::test_case;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Miracle cure discovered</title></head>
  <body>
    <nav><p>Home | News</p></nav>
    <article>
      <p>A shocking miracle cure has been found, sources claim.</p>
      <p>Doctors are said to be furious.</p>
    </article>
  </body>
</html>"#;

fn http_service() -> AnalyzerService {
    AnalyzerService::new(Arc::new(FixtureProvider::new()))
        .with_fetcher(Arc::new(HttpArticleFetcher::new(5_000).unwrap()))
}

#[tokio::test]
async fn test_fetched_article_is_scored_and_titled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/article"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(ARTICLE, "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = http_service();
    let url = format!("{}/news/article", server.uri());
    let result = service
        .analyze(AnalysisRequest::new(url.clone(), InputType::Url))
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::LikelyFake);

    let history = service.list_history().await.unwrap();
    assert_eq!(history[0].title, "Miracle cure discovered");
    assert_eq!(history[0].url.as_ref().map(url::Url::as_str), Some(url.as_str()));
    assert!(history[0].text_snippet.is_none());
}

#[test_case(402, ErrorKind::UnsupportedContent ; "paywall")]
#[test_case(404, ErrorKind::UnsupportedContent ; "missing page")]
#[test_case(503, ErrorKind::AnalysisUnavailable ; "site down")]
#[tokio::test]
async fn test_fetch_failures_leave_history_unchanged(status: u16, kind: ErrorKind) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let service = http_service();
    let err = service
        .analyze(AnalysisRequest::new(
            format!("{}/story", server.uri()),
            InputType::Url,
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), kind);
    assert!(service.list_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_html_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let err = http_service()
        .analyze(AnalysisRequest::new(
            format!("{}/report.pdf", server.uri()),
            InputType::Url,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedContent);
}

#[tokio::test]
async fn test_oversized_page_is_unsupported_and_not_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![b'x'; MAX_BODY_BYTES + 1], "text/html"),
        )
        .mount(&server)
        .await;

    let service = http_service();
    let err = service
        .analyze(AnalysisRequest::new(
            format!("{}/longread", server.uri()),
            InputType::Url,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedContent);
    assert!(service.list_history().await.unwrap().is_empty());
}
