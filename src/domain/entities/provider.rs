//! # Provider Entity
//!
//! Declarative description of a shipping carrier.
//!
//! A [`ProviderConfig`] carries everything the generic HTTP adapter needs to
//! talk to a carrier: the endpoint, a [`RequestConfig`] describing how to
//! render the outbound body, and a [`ResponseConfig`] describing where the
//! service offers live in the carrier's answer. No carrier-specific code
//! exists anywhere else.
//!
//! # Examples
//!
//! ```
//! use shipquote::domain::entities::provider::{ProviderConfig, RequestConfig, ResponseConfig, WireFormat};
//! use shipquote::domain::value_objects::ProviderId;
//!
//! let provider = ProviderConfig::new(ProviderId::new(1), "UPS", "https://ups.example/rate")
//!     .with_request_config(
//!         RequestConfig::xml("<RateRequest><From>{originZipCode}</From></RateRequest>")
//!             .with_header("Content-Type", "application/xml"),
//!     )
//!     .with_response_config(ResponseConfig::new(WireFormat::Xml).with_services_path("RatedShipment"));
//!
//! assert!(provider.is_active());
//! assert_eq!(provider.request_config().format(), WireFormat::Xml);
//! ```

use crate::domain::value_objects::ProviderId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Default HTTP method for carrier requests.
pub const DEFAULT_METHOD: &str = "POST";
/// Default path of the services collection in a carrier response.
pub const DEFAULT_SERVICES_PATH: &str = "services";
/// Default path of the service name inside one service record.
pub const DEFAULT_SERVICE_NAME_PATH: &str = "name";
/// Default path of the service code inside one service record.
pub const DEFAULT_SERVICE_CODE_PATH: &str = "code";
/// Default path of the price inside one service record.
pub const DEFAULT_PRICE_PATH: &str = "price";
/// Default path of the currency inside one service record.
pub const DEFAULT_CURRENCY_PATH: &str = "currency";

/// Serialization format of a request or a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// JSON document.
    #[default]
    Json,
    /// XML document.
    Xml,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

/// How to build the outbound request for a carrier.
///
/// In JSON mode `body` is a template tree whose string leaves may contain
/// `{placeholder}` tokens. In XML mode `xml_template` is a raw string with
/// the same tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    format: WireFormat,
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xml_template: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self::json(Value::Object(serde_json::Map::new()))
    }
}

impl RequestConfig {
    /// Creates a JSON request configuration with the given body template.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            format: WireFormat::Json,
            method: default_method(),
            headers: BTreeMap::new(),
            body,
            xml_template: None,
        }
    }

    /// Creates an XML request configuration with the given template.
    #[must_use]
    pub fn xml(template: impl Into<String>) -> Self {
        Self {
            format: WireFormat::Xml,
            method: default_method(),
            headers: BTreeMap::new(),
            body: Value::Null,
            xml_template: Some(template.into()),
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the request format.
    #[inline]
    #[must_use]
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Returns the configured HTTP method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the configured headers.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the JSON body template.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the XML template, or an empty string when none is set.
    #[inline]
    #[must_use]
    pub fn xml_template(&self) -> &str {
        self.xml_template.as_deref().unwrap_or_default()
    }
}

fn default_services_path() -> String {
    DEFAULT_SERVICES_PATH.to_string()
}

fn default_service_name_path() -> String {
    DEFAULT_SERVICE_NAME_PATH.to_string()
}

fn default_service_code_path() -> String {
    DEFAULT_SERVICE_CODE_PATH.to_string()
}

fn default_price_path() -> String {
    DEFAULT_PRICE_PATH.to_string()
}

fn default_currency_path() -> String {
    DEFAULT_CURRENCY_PATH.to_string()
}

/// Where to find service offers in a carrier response.
///
/// All paths are dotted paths; the four field paths are relative to one
/// element of the services collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseConfig {
    #[serde(default)]
    format: WireFormat,
    #[serde(default = "default_services_path")]
    services_path: String,
    #[serde(default = "default_service_name_path")]
    service_name_path: String,
    #[serde(default = "default_service_code_path")]
    service_code_path: String,
    #[serde(default = "default_price_path")]
    price_path: String,
    #[serde(default = "default_currency_path")]
    currency_path: String,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self::new(WireFormat::Json)
    }
}

impl ResponseConfig {
    /// Creates a response configuration with default paths.
    #[must_use]
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            services_path: default_services_path(),
            service_name_path: default_service_name_path(),
            service_code_path: default_service_code_path(),
            price_path: default_price_path(),
            currency_path: default_currency_path(),
        }
    }

    /// Sets the services collection path.
    #[must_use]
    pub fn with_services_path(mut self, path: impl Into<String>) -> Self {
        self.services_path = path.into();
        self
    }

    /// Sets the service name path.
    #[must_use]
    pub fn with_service_name_path(mut self, path: impl Into<String>) -> Self {
        self.service_name_path = path.into();
        self
    }

    /// Sets the service code path.
    #[must_use]
    pub fn with_service_code_path(mut self, path: impl Into<String>) -> Self {
        self.service_code_path = path.into();
        self
    }

    /// Sets the price path.
    #[must_use]
    pub fn with_price_path(mut self, path: impl Into<String>) -> Self {
        self.price_path = path.into();
        self
    }

    /// Sets the currency path.
    #[must_use]
    pub fn with_currency_path(mut self, path: impl Into<String>) -> Self {
        self.currency_path = path.into();
        self
    }

    /// Returns the response format.
    #[inline]
    #[must_use]
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Returns the services collection path.
    #[inline]
    #[must_use]
    pub fn services_path(&self) -> &str {
        &self.services_path
    }

    /// Returns the service name path.
    #[inline]
    #[must_use]
    pub fn service_name_path(&self) -> &str {
        &self.service_name_path
    }

    /// Returns the service code path.
    #[inline]
    #[must_use]
    pub fn service_code_path(&self) -> &str {
        &self.service_code_path
    }

    /// Returns the price path.
    #[inline]
    #[must_use]
    pub fn price_path(&self) -> &str {
        &self.price_path
    }

    /// Returns the currency path.
    #[inline]
    #[must_use]
    pub fn currency_path(&self) -> &str {
        &self.currency_path
    }
}

/// A shipping provider described entirely by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    id: ProviderId,
    name: String,
    active: bool,
    endpoint_url: String,
    #[serde(default)]
    request_config: RequestConfig,
    #[serde(default)]
    response_config: ResponseConfig,
}

impl ProviderConfig {
    /// Creates an active provider with default request and response configs.
    #[must_use]
    pub fn new(id: ProviderId, name: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            endpoint_url: endpoint_url.into(),
            request_config: RequestConfig::default(),
            response_config: ResponseConfig::default(),
        }
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the request configuration.
    #[must_use]
    pub fn with_request_config(mut self, request_config: RequestConfig) -> Self {
        self.request_config = request_config;
        self
    }

    /// Sets the response configuration.
    #[must_use]
    pub fn with_response_config(mut self, response_config: ResponseConfig) -> Self {
        self.response_config = response_config;
        self
    }

    /// Returns the provider ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// Returns the provider name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the provider takes part in quoting.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the carrier endpoint URL.
    #[inline]
    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Returns the request configuration.
    #[inline]
    #[must_use]
    pub fn request_config(&self) -> &RequestConfig {
        &self.request_config
    }

    /// Returns the response configuration.
    #[inline]
    #[must_use]
    pub fn response_config(&self) -> &ResponseConfig {
        &self.response_config
    }

    /// Sets the provider ID.
    pub fn set_id(&mut self, id: ProviderId) {
        self.id = id;
    }

    /// Sets the provider name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the active flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Sets the carrier endpoint URL.
    pub fn set_endpoint_url(&mut self, endpoint_url: impl Into<String>) {
        self.endpoint_url = endpoint_url.into();
    }

    /// Replaces the request configuration.
    pub fn set_request_config(&mut self, request_config: RequestConfig) {
        self.request_config = request_config;
    }

    /// Replaces the response configuration.
    pub fn set_response_config(&mut self, response_config: ResponseConfig) {
        self.response_config = response_config;
    }
}

impl fmt::Display for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider({}: {})", self.id, self.name)
    }
}
