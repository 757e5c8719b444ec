//! Fetcher that performs no network access.

use async_trait::async_trait;
use url::Url;

use crate::contract::Document;
use crate::error::AnalysisError;
use crate::traits::ArticleFetcher;

/// Uses the URL itself as the document text.
///
/// Pairs with keyword-routed providers, which then score the words in the
/// URL path.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFetcher;

#[async_trait]
impl ArticleFetcher for PassthroughFetcher {
    async fn fetch(&self, url: &Url) -> Result<Document, AnalysisError> {
        Ok(Document::from_url(url.clone(), None, url.as_str()))
    }
}
