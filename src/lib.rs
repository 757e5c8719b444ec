//! Credibility Analyzer
//!
//! An analyzer service that scores news articles and free text for
//! credibility, keeps a concurrent history of completed analyses and serves
//! both over HTTP.
//!
//! # Features
//!
//! - Three-way verdict derived from a continuous score in `[0, 1]`
//! - Pluggable scoring: canned fixtures, a keyword heuristic or the
//!   Anthropic Messages API
//! - URL submissions scored as-is or fetched and extracted from HTML
//! - In-memory or `SQLite` history, newest first, safe under concurrent writers
//! - History change events, in-process and as server-sent events
//!
//! # Quick Start
//!
//! ```bash
//! ANALYZER_PROVIDER=heuristic ./credibility-analyzer
//! curl -X POST localhost:8000/api/analyze \
//!      -H 'content-type: application/json' \
//!      -d '{"input": "Shocking miracle cure", "type": "text"}'
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   HTTP    ┌─────────────────┐     ┌──────────────────┐
//! │  Consumer  │──────────▶│ AnalyzerService │────▶│ ArticleFetcher   │
//! │ (browser)  │◀──────────│                 │────▶│ ScoringProvider  │──▶ Anthropic API
//! └────────────┘  JSON/SSE └────────┬────────┘     └──────────────────┘
//!                                   │
//!                                   ▼
//!                             HistoryStore (memory | SQLite)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anthropic;
pub mod config;
pub mod contract;
pub mod error;
pub mod fetch;
pub mod history;
pub mod providers;
pub mod server;
pub mod service;
pub mod traits;

#[cfg(test)]
mod test_utils;
