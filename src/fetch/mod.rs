//! Article fetchers.
//!
//! - [`PassthroughFetcher`]: no network, the URL is the document
//! - [`HttpArticleFetcher`]: downloads the page and extracts article text

mod http;
mod passthrough;

pub use http::{
    extract_text, extract_title, parse_article, HttpArticleFetcher, DEFAULT_FETCH_TIMEOUT_MS,
    MAX_BODY_BYTES, USER_AGENT,
};
pub use passthrough::PassthroughFetcher;
