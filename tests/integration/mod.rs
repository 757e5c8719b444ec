//! End-to-end workflow tests for the credibility analyzer.

mod cancellation;
mod concurrency;
mod fetching;
mod http_api;
mod persistence;
