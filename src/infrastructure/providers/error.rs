//! # Provider Errors
//!
//! Error types for carrier adapter operations.
//!
//! Errors fall into two kinds. Transport errors (timeout, refused
//! connection, DNS) mean the carrier could not be reached; everything else
//! means the carrier was reached but its configuration or answer could not
//! be turned into quotes.
//!
//! # Examples
//!
//! ```
//! use shipquote::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::timeout("no answer after 5000ms");
//! assert!(error.is_transport());
//!
//! let error = ProviderError::invalid_price("price is not numeric");
//! assert!(!error.is_transport());
//! ```

use crate::domain::entities::QuoteErrorCode;
use thiserror::Error;

/// Error type for carrier adapter operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network, DNS or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Provider configuration could not be turned into a request.
    #[error("provider template error: {message}")]
    Template {
        /// Error message.
        message: String,
    },

    /// Carrier response could not be parsed or lacks required fields.
    #[error("provider malformed response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// Price missing, non-numeric or negative.
    #[error("provider invalid price: {message}")]
    InvalidPrice {
        /// Error message.
        message: String,
    },

    /// Internal error.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a template error.
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(message: impl Into<String>) -> Self {
        Self::InvalidPrice {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the carrier could not be reached.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }

    /// Returns the quote placeholder code for this error.
    #[must_use]
    pub fn error_code(&self) -> QuoteErrorCode {
        if self.is_transport() {
            QuoteErrorCode::ProviderUnavailable
        } else {
            QuoteErrorCode::ProviderError
        }
    }
}

/// Result type for carrier adapter operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
