//! # REST Error Responses
//!
//! Every `/api` failure is rendered as
//! `{"success": false, "error": {"code", "message", "details"?}}` with the
//! status of the underlying [`ApplicationError`].

use crate::application::error::ApplicationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Error body.
    pub error: ErrorBody,
}

/// Error body inside [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Structured details, when the error kind has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&ApplicationError> for ErrorResponse {
    fn from(err: &ApplicationError) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: err.error_code().to_string(),
                message: err.client_message(),
                details: err.details(),
            },
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(code = self.error_code(), error = %self, "Request rejected");
        } else {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }

        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::RepositoryError;
    use serde_json::json;

    #[test]
    fn envelope_omits_empty_details() {
        let body = ErrorResponse::from(&ApplicationError::not_found("Resource not found"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "success": false,
                "error": { "code": "NOT_FOUND", "message": "Resource not found" }
            })
        );
    }

    #[test]
    fn envelope_carries_details() {
        let body = ErrorResponse::from(&ApplicationError::missing_params(["providerId"]));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "success": false,
                "error": {
                    "code": "MISSING_PARAMS",
                    "message": "Missing required parameters: providerId",
                    "details": { "missing": ["providerId"] }
                }
            })
        );
    }

    #[test]
    fn response_uses_error_status() {
        let response = ApplicationError::method_not_allowed("delete", ["find_all"]).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response: Response =
            ApplicationError::from(RepositoryError::query("syntax error")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
