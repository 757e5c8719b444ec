//! Error types for the credibility analyzer.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`AnalysisError`]: The consumer-facing taxonomy of the analyzer contract
//! - [`AnthropicError`]: Anthropic API specific errors
//! - [`StorageError`]: History store errors
//! - [`ConfigError`]: Configuration errors
//!
//! Subsystem errors convert into [`AnalysisError`] so that every failure
//! surfaced to a consumer carries exactly one of the three contract
//! categories. All errors implement `Send + Sync` for async compatibility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic message shown to users for transient failures.
pub const UNAVAILABLE_USER_MESSAGE: &str =
    "The analysis service is temporarily unavailable. Please try again in a moment.";

/// Top-level application error.
///
/// Returned by startup and wiring code; request handling uses
/// [`AnalysisError`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Analysis contract error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Anthropic API error.
    #[error("Anthropic API error: {0}")]
    Anthropic(#[from] AnthropicError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP server error.
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Category of an [`AnalysisError`].
///
/// Serialized into the `error` field of HTTP error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller-supplied input is malformed.
    ValidationError,
    /// Input is well-formed but its content cannot be analyzed.
    UnsupportedContent,
    /// Transient backend or network failure.
    AnalysisUnavailable,
}

impl ErrorKind {
    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::UnsupportedContent => "unsupported_content",
            Self::AnalysisUnavailable => "analysis_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors of the analyzer service contract.
///
/// Every operation of [`crate::service::AnalyzerService`] fails with one of
/// these three categories.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Caller-supplied input is malformed. Not retryable without changing the input.
    #[error("Invalid input: {message}")]
    Validation {
        /// What is wrong with the input.
        message: String,
    },

    /// The content could not be analyzed. Retrying with the same input will not help.
    #[error("Unsupported content: {message}")]
    UnsupportedContent {
        /// Why the content could not be analyzed.
        message: String,
    },

    /// The scoring backend could not be reached or failed. Safe to retry.
    #[error("Analysis unavailable: {message}")]
    Unavailable {
        /// Diagnostic detail. Logged, never shown to users.
        message: String,
    },
}

impl AnalysisError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unsupported-content error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedContent {
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// The contract category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::UnsupportedContent { .. } => ErrorKind::UnsupportedContent,
            Self::Unavailable { .. } => ErrorKind::AnalysisUnavailable,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Message safe to show to an end user.
    ///
    /// Validation and unsupported-content messages are surfaced verbatim;
    /// unavailable errors get a generic retry message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::UnsupportedContent { message } => format!(
                "This content could not be analyzed ({message}). Please try a different URL or paste the article text."
            ),
            Self::Unavailable { .. } => UNAVAILABLE_USER_MESSAGE.to_string(),
        }
    }
}

impl From<StorageError> for AnalysisError {
    fn from(err: StorageError) -> Self {
        Self::Unavailable {
            message: err.to_string(),
        }
    }
}

impl From<AnthropicError> for AnalysisError {
    fn from(err: AnthropicError) -> Self {
        Self::Unavailable {
            message: err.to_string(),
        }
    }
}

/// Anthropic API errors.
///
/// These errors represent failures when communicating with the Anthropic API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The requested model is overloaded.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// The model that is overloaded.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl AnthropicError {
    /// Returns true if this error is retryable.
    ///
    /// Rate limiting, overload, timeouts and network errors are retryable.
    /// Authentication and invalid request errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ModelOverloaded { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }

    /// Returns true if the deployment is misconfigured, e.g. a rejected API key.
    ///
    /// These still surface as [`AnalysisError::Unavailable`] to consumers,
    /// but operators need to act on them.
    #[must_use]
    pub const fn is_configuration_fault(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

/// Storage errors.
///
/// These errors represent failures in history store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// The query that failed (may be truncated).
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// Database migration failed.
    #[error("Migration failed: {version} - {message}")]
    MigrationFailed {
        /// The migration version that failed.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// A stored record could not be decoded.
    #[error("Corrupt record {id}: {message}")]
    CorruptRecord {
        /// Identifier of the record.
        id: String,
        /// Description of the decoding failure.
        message: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;
    use test_case::test_case;

    assert_impl_all!(AppError: Send, Sync, std::error::Error);
    assert_impl_all!(AnalysisError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(AnthropicError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(StorageError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ConfigError: Send, Sync, std::error::Error, Clone);

    #[test_case(AnalysisError::validation("x"), ErrorKind::ValidationError ; "validation")]
    #[test_case(AnalysisError::unsupported("x"), ErrorKind::UnsupportedContent ; "unsupported")]
    #[test_case(AnalysisError::unavailable("x"), ErrorKind::AnalysisUnavailable ; "unavailable")]
    fn test_analysis_error_kind(err: AnalysisError, expected: ErrorKind) {
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(AnalysisError::unavailable("down").is_retryable());
        assert!(!AnalysisError::validation("empty").is_retryable());
        assert!(!AnalysisError::unsupported("paywall").is_retryable());
    }

    #[test]
    fn test_error_kind_wire_names() {
        assert_eq!(ErrorKind::ValidationError.as_str(), "validation_error");
        assert_eq!(ErrorKind::UnsupportedContent.as_str(), "unsupported_content");
        assert_eq!(
            ErrorKind::AnalysisUnavailable.as_str(),
            "analysis_unavailable"
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::UnsupportedContent).unwrap(),
            "\"unsupported_content\""
        );
    }

    #[test]
    fn test_user_message_hides_unavailable_detail() {
        let err = AnalysisError::unavailable("connection refused at 10.0.0.3:443");
        let shown = err.user_message();
        assert_eq!(shown, UNAVAILABLE_USER_MESSAGE);
        assert!(!shown.contains("10.0.0.3"));
    }

    #[test]
    fn test_user_message_surfaces_validation_verbatim() {
        let err = AnalysisError::validation("Input must not be empty");
        assert_eq!(err.user_message(), "Input must not be empty");
    }

    #[test]
    fn test_user_message_unsupported_includes_reason() {
        let err = AnalysisError::unsupported("resource is not an HTML page");
        assert!(err.user_message().contains("not an HTML page"));
    }

    #[test]
    fn test_analysis_error_display() {
        assert_eq!(
            AnalysisError::validation("bad url").to_string(),
            "Invalid input: bad url"
        );
        assert_eq!(
            AnalysisError::unsupported("paywalled").to_string(),
            "Unsupported content: paywalled"
        );
        assert_eq!(
            AnalysisError::unavailable("timeout").to_string(),
            "Analysis unavailable: timeout"
        );
    }

    #[test]
    fn test_storage_error_converts_to_unavailable() {
        let err: AnalysisError = StorageError::ConnectionFailed {
            message: "disk gone".to_string(),
        }
        .into();
        assert!(matches!(err, AnalysisError::Unavailable { .. }));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_anthropic_error_converts_to_unavailable() {
        let err: AnalysisError = AnthropicError::AuthenticationFailed.into();
        assert_eq!(err.kind(), ErrorKind::AnalysisUnavailable);
    }

    #[test]
    fn test_app_error_display_analysis() {
        let err = AppError::Analysis(AnalysisError::validation("empty"));
        assert_eq!(err.to_string(), "Analysis error: Invalid input: empty");
    }

    #[test]
    fn test_app_error_display_config() {
        let err = AppError::Config(ConfigError::MissingRequired {
            var: "ANTHROPIC_API_KEY".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required: ANTHROPIC_API_KEY"
        );
    }

    #[test]
    fn test_app_error_from_storage_error() {
        let app_err: AppError = StorageError::MigrationFailed {
            version: "001".to_string(),
            message: "syntax".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Storage(_)));
    }

    #[test]
    fn test_anthropic_error_display_rate_limited() {
        let err = AnthropicError::RateLimited {
            retry_after_seconds: 60,
        };
        assert_eq!(err.to_string(), "Rate limited: retry after 60s");
    }

    #[test_case(AnthropicError::RateLimited { retry_after_seconds: 1 }, true ; "rate limited")]
    #[test_case(AnthropicError::ModelOverloaded { model: "m".into() }, true ; "overloaded")]
    #[test_case(AnthropicError::Timeout { timeout_ms: 1 }, true ; "timeout")]
    #[test_case(AnthropicError::Network { message: "n".into() }, true ; "network")]
    #[test_case(AnthropicError::AuthenticationFailed, false ; "auth")]
    #[test_case(AnthropicError::InvalidRequest { message: "i".into() }, false ; "invalid")]
    #[test_case(AnthropicError::UnexpectedResponse { message: "u".into() }, false ; "unexpected")]
    fn test_anthropic_error_is_retryable(err: AnthropicError, expected: bool) {
        assert_eq!(err.is_retryable(), expected);
    }

    #[test_case(AnthropicError::AuthenticationFailed, true ; "auth")]
    #[test_case(AnthropicError::Timeout { timeout_ms: 1 }, false ; "timeout")]
    #[test_case(AnthropicError::InvalidRequest { message: "i".into() }, false ; "invalid")]
    fn test_anthropic_error_is_configuration_fault(err: AnthropicError, expected: bool) {
        assert_eq!(err.is_configuration_fault(), expected);
    }

    #[test]
    fn test_storage_error_display_query_failed() {
        let err = StorageError::QueryFailed {
            query: "SELECT history".to_string(),
            message: "locked".to_string(),
        };
        assert_eq!(err.to_string(), "Query failed: SELECT history - locked");
    }

    #[test]
    fn test_storage_error_display_corrupt_record() {
        let err = StorageError::CorruptRecord {
            id: "abc".to_string(),
            message: "bad json".to_string(),
        };
        assert_eq!(err.to_string(), "Corrupt record abc: bad json");
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            var: "RECENT_LIMIT".to_string(),
            reason: "must be between 1 and 100".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for RECENT_LIMIT: must be between 1 and 100"
        );
    }

    #[test]
    fn test_analysis_error_clone_eq() {
        let err = AnalysisError::unsupported("non-html");
        assert_eq!(err.clone(), err);
        assert_ne!(err, AnalysisError::unsupported("other"));
    }
}
