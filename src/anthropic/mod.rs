//! Anthropic API client.
//!
//! This module provides:
//! - Direct Claude Messages API integration
//! - Retry logic with exponential backoff
//! - JSON extraction from model replies
//!
//! The client backs [`crate::providers::LlmProvider`] through
//! [`crate::traits::AnthropicClientTrait`].

mod client;
mod config;
mod json;
mod types;

pub use client::{AnthropicClient, MAX_CONTENT_LENGTH, MAX_MESSAGES};
pub use config::{
    ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
pub use json::extract_json;
pub use types::{ApiErrorBody, ApiErrorDetails, ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock};
