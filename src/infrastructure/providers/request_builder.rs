//! # Request Builder
//!
//! Renders a provider's declarative request template into a concrete HTTP
//! request for one shipment.
//!
//! Templates reference trip parameters through `{placeholder}` tokens (see
//! [`PLACEHOLDERS`](crate::domain::value_objects::shipment::PLACEHOLDERS)).
//! Substitution is a single left-to-right pass: substituted values are
//! never rescanned and unknown tokens are kept literally.
//!
//! - JSON mode walks the body tree and substitutes inside every string
//!   leaf. Numbers, booleans and nulls pass through untouched.
//! - XML mode substitutes inside the raw template text. No XML parsing
//!   happens on the outbound side.

use crate::domain::entities::{RequestConfig, WireFormat};
use crate::domain::value_objects::ShipmentRequest;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{Map, Value};

/// Rendered request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document.
    Json(Value),
    /// Raw XML text.
    Xml(String),
}

/// Everything needed to send a carrier request.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
}

/// Replaces `{placeholder}` tokens in `template` with trip parameters.
#[must_use]
pub fn substitute(template: &str, shipment: &ShipmentRequest) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, from_open) = rest.split_at(open);
        out.push_str(before);
        let (_, tail) = from_open.split_at(1);

        match tail.find(['{', '}']) {
            Some(end) if tail.as_bytes().get(end) == Some(&b'}') => {
                let (name, after) = tail.split_at(end);
                match shipment.placeholder(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = after.split_at(1).1;
            }
            _ => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Substitutes placeholders in every string leaf of a JSON template.
#[must_use]
pub fn render_json(template: &Value, shipment: &ShipmentRequest) -> Value {
    match template {
        Value::String(text) => Value::String(substitute(text, shipment)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_json(item, shipment))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), render_json(value, shipment)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Renders the request body for the configured format.
///
/// A missing JSON body renders as `{}`. XML mode is stricter: an absent,
/// empty or whitespace-only `xml_template` is refused rather than posted as
/// an empty body, so a half-configured XML carrier reports `PROVIDER_ERROR`
/// without a network round trip.
///
/// # Errors
///
/// Returns `ProviderError::Template` if XML mode has no usable template.
pub fn build_body(config: &RequestConfig, shipment: &ShipmentRequest) -> ProviderResult<RequestBody> {
    match config.format() {
        WireFormat::Json => {
            let body = match config.body() {
                Value::Null => Value::Object(Map::new()),
                template => render_json(template, shipment),
            };
            Ok(RequestBody::Json(body))
        }
        WireFormat::Xml => {
            let template = config.xml_template();
            if template.trim().is_empty() {
                return Err(ProviderError::template("xml request format without xml_template"));
            }
            Ok(RequestBody::Xml(substitute(template, shipment)))
        }
    }
}

/// Parses the configured HTTP method.
///
/// # Errors
///
/// Returns `ProviderError::Template` for an invalid method token.
pub fn build_method(config: &RequestConfig) -> ProviderResult<Method> {
    Method::from_bytes(config.method().trim().to_ascii_uppercase().as_bytes())
        .map_err(|e| ProviderError::template(format!("invalid method {:?}: {}", config.method(), e)))
}

/// Converts the configured headers into a header map.
///
/// # Errors
///
/// Returns `ProviderError::Template` for an invalid header name or value.
pub fn build_headers(config: &RequestConfig) -> ProviderResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(config.headers().len());
    for (name, value) in config.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ProviderError::template(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ProviderError::template(format!("invalid header value for {}: {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Builds the full request for one shipment.
///
/// # Errors
///
/// Returns `ProviderError::Template` if any part of the configuration is
/// unusable.
pub fn prepare(config: &RequestConfig, shipment: &ShipmentRequest) -> ProviderResult<PreparedRequest> {
    Ok(PreparedRequest {
        method: build_method(config)?,
        headers: build_headers(config)?,
        body: build_body(config, shipment)?,
    })
}
