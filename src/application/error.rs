//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Every variant carries the stable code clients see in the error envelope
//! and maps onto one HTTP status.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── BadRequest          - malformed or invalid input (400)
//! ├── MissingParams       - required body fields absent (400)
//! ├── Unauthorized        - unknown or absent caller (401)
//! ├── NotFound            - missing resource (404)
//! ├── MethodNotAllowed    - operation disabled on a resource (405)
//! ├── Repository          - storage failure (500)
//! └── Internal            - anything else (500)
//! ```
//!
//! # Examples
//!
//! ```
//! use shipquote::application::error::ApplicationError;
//!
//! let err = ApplicationError::bad_request("Invalid ID");
//! assert_eq!(err.error_code(), "BAD_REQUEST");
//! assert_eq!(err.status(), 400);
//! ```

use crate::infrastructure::persistence::RepositoryError;
use serde_json::{Value, json};
use thiserror::Error;

/// Code for generic client errors.
pub const BAD_REQUEST: &str = "BAD_REQUEST";
/// Code for unparseable request bodies.
pub const INVALID_JSON: &str = "INVALID_JSON";
/// Code for update fields of the wrong type.
pub const INVALID_FIELD: &str = "INVALID_FIELD";
/// Code for missing required fields.
pub const MISSING_PARAMS: &str = "MISSING_PARAMS";
/// Code for non-numeric request parameters.
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
/// Code for non-positive package dimensions.
pub const INVALID_DIMENSIONS: &str = "INVALID_DIMENSIONS";
/// Code for missing resources.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Code for disabled operations.
pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
/// Code for callers whose token resolves to no user.
pub const AUTH_ERROR: &str = "AUTH_ERROR";
/// Code for anonymous callers on endpoints that need a user.
pub const AUTH_NOT_AUTHENTICATED: &str = "AUTH_NOT_AUTHENTICATED";
/// Code for unexpected failures.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request input failed validation.
    #[error("{message}")]
    BadRequest {
        /// Stable error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Required fields were absent from the request body.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParams(Vec<String>),

    /// Caller is unknown or anonymous where a user is required.
    #[error("{message}")]
    Unauthorized {
        /// Stable error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Resource not found.
    #[error("{message}")]
    NotFound {
        /// Stable error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// The operation is disabled for this resource.
    #[error("Method {method} is not allowed for this resource")]
    MethodNotAllowed {
        /// Rejected method.
        method: String,
        /// Methods the resource accepts.
        allowed: Vec<String>,
    },

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a generic bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Creates an error for an unparseable body.
    #[must_use]
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: INVALID_JSON,
            message: message.into(),
        }
    }

    /// Creates a bad request error with a specific code.
    #[must_use]
    pub fn bad_request_with_code(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    /// Creates an error for an update field of the wrong type.
    #[must_use]
    pub fn invalid_field(field: &str) -> Self {
        Self::BadRequest {
            code: INVALID_FIELD,
            message: format!("Invalid field: {field}"),
        }
    }

    /// Creates a missing parameters error.
    #[must_use]
    pub fn missing_params<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParams(params.into_iter().map(Into::into).collect())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            code: NOT_FOUND,
            message: message.into(),
        }
    }

    /// Creates an error for a token whose subject maps to no user.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: AUTH_ERROR,
            message: message.into(),
        }
    }

    /// Creates an error for an anonymous caller.
    #[must_use]
    pub fn not_authenticated() -> Self {
        Self::Unauthorized {
            code: AUTH_NOT_AUTHENTICATED,
            message: "User not authenticated".to_string(),
        }
    }

    /// Creates a method not allowed error.
    #[must_use]
    pub fn method_not_allowed<I, S>(method: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MethodNotAllowed {
            method: method.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the stable code reported to clients.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. }
            | Self::Unauthorized { code, .. }
            | Self::NotFound { code, .. } => *code,
            Self::MissingParams(_) => MISSING_PARAMS,
            Self::MethodNotAllowed { .. } => METHOD_NOT_ALLOWED,
            Self::Repository(_) | Self::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest { .. } | Self::MissingParams(_) => 400,
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::Repository(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns structured details for the envelope, if any.
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::MissingParams(params) => Some(json!({ "missing": params })),
            Self::MethodNotAllowed { allowed, .. } => Some(json!({ "allowed_methods": allowed })),
            _ => None,
        }
    }

    /// Returns the message shown to clients.
    ///
    /// Server-side failures are reported generically.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Repository(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns true if this error is the caller's fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
