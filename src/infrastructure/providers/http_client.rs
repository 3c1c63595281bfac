//! # HTTP Client
//!
//! Shared HTTP client for carrier adapters.
//!
//! Wraps a single `reqwest` client with a request timeout and maps
//! transport failures onto [`ProviderError`]. Non-2xx statuses are not
//! errors here: the raw body is handed back so the response normalizer
//! can still look at it.
//!
//! # Examples
//!
//! ```ignore
//! use shipquote::infrastructure::providers::http_client::HttpClient;
//! use shipquote::infrastructure::providers::request_builder::RequestBody;
//!
//! let client = HttpClient::new(5000)?;
//! let response = client
//!     .send(reqwest::Method::POST, "https://carrier.example/rates", HeaderMap::new(), RequestBody::Json(body))
//!     .await?;
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::request_builder::RequestBody;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;

/// Status and body of a carrier response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body as text.
    pub body: String,
}

/// HTTP client wrapper for carrier adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Sends one request and returns the raw response.
    ///
    /// JSON bodies are serialized with `application/json` unless the
    /// headers already carry a content type; XML bodies are sent verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Timeout` or `ProviderError::Connection` if
    /// the carrier cannot be reached or the body cannot be read.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: RequestBody,
    ) -> ProviderResult<RawResponse> {
        let request = self.client.request(method, url).headers(headers);
        let request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Xml(text) => request.body(text),
        };

        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_reqwest_error(e))?;

        Ok(RawResponse { status, body })
    }

    /// Maps a reqwest error to a ProviderError.
    ///
    /// Only failures to reach the carrier are transport errors. A request
    /// that cannot even be built (unparsable or unsupported endpoint URL,
    /// invalid header) is a configuration problem of the provider.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_builder() {
            ProviderError::template(format!("Invalid carrier request: {}", error))
        } else if error.is_connect() {
            ProviderError::connection(format!("Connection failed: {}", error))
        } else if error.is_redirect() {
            ProviderError::internal(format!("Redirect policy violated: {}", error))
        } else if error.is_decode() {
            ProviderError::malformed_response(format!("Undecodable response body: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().timeout_ms(), 5000);
    }

    #[tokio::test]
    async fn unparsable_url_is_not_a_transport_error() {
        let client = HttpClient::new(1000).unwrap();
        let error = client
            .send(
                Method::POST,
                "not a url",
                HeaderMap::new(),
                RequestBody::Json(serde_json::json!({})),
            )
            .await
            .expect_err("the URL cannot be parsed");

        assert!(!error.is_transport());
        assert!(matches!(error, ProviderError::Template { .. }));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let client = HttpClient::new(1000).unwrap();
        let result = client
            .send(
                Method::POST,
                "http://127.0.0.1:1/rates",
                HeaderMap::new(),
                RequestBody::Xml("<Q/>".to_string()),
            )
            .await;

        let error = result.expect_err("nothing listens on port 1");
        assert!(error.is_transport());
    }
}
