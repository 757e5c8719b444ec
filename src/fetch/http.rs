//! HTTP article fetcher with HTML extraction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use scraper::{Html, Selector};
use url::Url;

use crate::contract::Document;
use crate::error::AnalysisError;
use crate::traits::ArticleFetcher;

/// User agent sent with article requests.
pub const USER_AGENT: &str = concat!("credibility-analyzer/", env!("CARGO_PKG_VERSION"));

/// Largest accepted response body.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Default request timeout.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Fetches a page over HTTP and extracts its title and paragraph text.
#[derive(Debug, Clone)]
pub struct HttpArticleFetcher {
    client: Client,
    timeout_ms: u64,
}

impl HttpArticleFetcher {
    /// Create a fetcher with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(timeout_ms: u64) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AnalysisError::unavailable(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, timeout_ms })
    }

    fn map_send_error(&self, url: &Url, err: &reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            tracing::warn!(url = %url, timeout_ms = self.timeout_ms, "Article fetch timed out");
            AnalysisError::unavailable(format!("fetching {url} timed out"))
        } else {
            tracing::info!(url = %url, error = %err, "Article fetch failed");
            AnalysisError::unsupported(format!("the page at {url} could not be reached"))
        }
    }

    /// Read the body chunk by chunk, giving up once it passes [`MAX_BODY_BYTES`].
    async fn read_body(&self, url: &Url, mut response: Response) -> Result<String, AnalysisError> {
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_send_error(url, &e))?
        {
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                tracing::info!(url = %url, read = body.len(), "Article body over size limit");
                return Err(too_large(url));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn too_large(url: &Url) -> AnalysisError {
    AnalysisError::unsupported(format!("the page at {url} is too large to analyze"))
}

fn check_status(url: &Url, status: StatusCode) -> Result<(), AnalysisError> {
    match status.as_u16() {
        200..=299 => Ok(()),
        401 | 402 | 403 | 451 => Err(AnalysisError::unsupported(format!(
            "the page at {url} is paywalled or access is restricted ({status})"
        ))),
        408 | 429 | 500..=599 => {
            tracing::warn!(url = %url, status = %status, "Transient article fetch failure");
            Err(AnalysisError::unavailable(format!(
                "the site returned {status} for {url}"
            )))
        }
        _ => Err(AnalysisError::unsupported(format!(
            "the page at {url} returned {status}"
        ))),
    }
}

fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_none_or(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.contains("text/html") || ct.contains("application/xhtml+xml")
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn meta_property(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[property=\"{property}\"]")).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
}

/// Title from `<title>`, falling back to `og:title`.
#[must_use]
pub fn extract_title(document: &Html) -> Option<String> {
    Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        })
        .filter(|t| !t.is_empty())
        .or_else(|| meta_property(document, "og:title"))
}

fn paragraphs(document: &Html, selector: &str) -> Vec<String> {
    Selector::parse(selector)
        .map(|selector| {
            document
                .select(&selector)
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Article text: paragraphs inside `<article>`, else every paragraph.
#[must_use]
pub fn extract_text(document: &Html) -> String {
    let mut found = paragraphs(document, "article p");
    if found.is_empty() {
        found = paragraphs(document, "p");
    }
    found.join("\n\n")
}

/// Build a document from an HTML page.
///
/// # Errors
///
/// Returns [`AnalysisError::UnsupportedContent`] if the page has no
/// paragraph text.
pub fn parse_article(url: &Url, html: &str) -> Result<Document, AnalysisError> {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let text = extract_text(&document);
    if text.is_empty() {
        return Err(AnalysisError::unsupported(format!(
            "no article text was found at {url}"
        )));
    }
    Ok(Document::from_url(url.clone(), title, text))
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &Url) -> Result<Document, AnalysisError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AnalysisError::unsupported(format!(
                "only http and https URLs can be fetched, got {}",
                url.scheme()
            )));
        }

        tracing::debug!(url = %url, "Fetching article");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| self.map_send_error(url, &e))?;

        check_status(url, response.status())?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        if !is_html(content_type.as_deref()) {
            return Err(AnalysisError::unsupported(format!(
                "the resource at {url} is not an HTML page ({})",
                content_type.unwrap_or_default()
            )));
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_BODY_BYTES as u64)
        {
            return Err(too_large(url));
        }

        let body = self.read_body(url, response).await?;
        let document = parse_article(url, &body)?;
        tracing::debug!(
            url = %url,
            title = ?document.title,
            chars = document.text.len(),
            "Article extracted"
        );
        Ok(document)
    }
}
