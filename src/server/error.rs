//! HTTP error mapping.
//!
//! Every failing endpoint answers with the same body:
//! `{"error": <category>, "message": <user message>, "request_id": <uuid>}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AnalysisError, ErrorKind};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category, e.g. `validation_error`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Unique id for correlating with server logs.
    pub request_id: String,
}

/// Error returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A contract error from the analyzer service.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// No analysis with this id (404).
    #[error("Analysis not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Wire name of the error category.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.kind().as_str(),
            Self::NotFound(_) => "not_found",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Analysis(e) => e.user_message(),
            Self::NotFound(_) => self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Analysis(e) => match e.kind() {
                ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
                ErrorKind::UnsupportedContent => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::AnalysisUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let request_id = Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status = status.as_u16(),
                request_id = %request_id,
                detail = %self,
                "API error"
            );
        } else {
            tracing::debug!(
                error_type = self.error_type(),
                status = status.as_u16(),
                request_id = %request_id,
                detail = %self,
                "API error"
            );
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.error_type().to_string(),
            message: self.user_message(),
            request_id,
        })
    }
}

/// Reports undecodable JSON bodies as validation errors.
pub(crate) fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::from(AnalysisError::validation(format!(
        "Request body is not a valid analysis request: {err}"
    )))
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use test_case::test_case;

    #[test_case(AnalysisError::validation("empty"), StatusCode::BAD_REQUEST, "validation_error")]
    #[test_case(AnalysisError::unsupported("paywall"), StatusCode::UNPROCESSABLE_ENTITY, "unsupported_content")]
    #[test_case(AnalysisError::unavailable("down"), StatusCode::SERVICE_UNAVAILABLE, "analysis_unavailable")]
    fn test_analysis_error_status(err: AnalysisError, status: StatusCode, error_type: &str) {
        let api = ApiError::from(err);
        assert_eq!(api.status_code(), status);
        assert_eq!(api.error_type(), error_type);
    }

    #[test]
    fn test_not_found_status() {
        let api = ApiError::NotFound("abc".to_string());
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api.error_type(), "not_found");
    }

    #[actix_web::test]
    async fn test_unavailable_body_hides_detail() {
        let response = ApiError::from(AnalysisError::unavailable("db locked at /var/x")).error_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "analysis_unavailable");
        assert!(!parsed.message.contains("/var/x"));
        assert!(Uuid::parse_str(&parsed.request_id).is_ok());
    }
}
