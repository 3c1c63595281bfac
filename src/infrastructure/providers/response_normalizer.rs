//! # Response Normalizer
//!
//! Turns a raw carrier response into [`ServiceQuote`]s.
//!
//! The body is parsed into a value tree (directly for JSON, through
//! [`xml::to_value`] for XML), the services collection is located with
//! the configured `services_path`, and each mapping element yields one
//! quote through the four per-field paths.
//!
//! Tolerated shapes:
//! - services path absent or not a collection: no services
//! - a single mapping instead of a sequence: promoted to one service
//! - non-mapping elements inside the collection: skipped
//! - unparsable XML: no services (logged)
//!
//! Rejected shapes, reported as errors so the provider shows up as failed
//! rather than quoting a bogus price:
//! - unparsable JSON
//! - a service without a name
//! - a missing, non-numeric or negative price

use crate::domain::entities::{ResponseConfig, ServiceQuote, WireFormat, DEFAULT_CURRENCY};
use crate::domain::value_objects::coerce_decimal;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::path::resolve;
use crate::infrastructure::providers::xml;
use serde_json::{Map, Value};
use tracing::warn;

/// Parses a raw body according to the response format.
///
/// # Errors
///
/// Returns `ProviderError::MalformedResponse` for unparsable JSON. XML
/// parse failures are logged and yield an empty tree.
pub fn parse_tree(body: &str, format: WireFormat) -> ProviderResult<Value> {
    match format {
        WireFormat::Json => serde_json::from_str(body)
            .map_err(|e| ProviderError::malformed_response(format!("invalid json: {}", e))),
        WireFormat::Xml => match xml::to_value(body) {
            Ok(tree) => Ok(tree),
            Err(e) => {
                warn!(error = %e, "Unparsable XML response, treating as empty");
                Ok(Value::Object(Map::new()))
            }
        },
    }
}

/// Parses a raw body and extracts its service quotes.
///
/// # Errors
///
/// See [`parse_tree`] and [`extract`].
pub fn parse(body: &str, config: &ResponseConfig) -> ProviderResult<Vec<ServiceQuote>> {
    let tree = parse_tree(body, config.format())?;
    extract(&tree, config)
}

/// Extracts service quotes from an already parsed tree.
///
/// Output order follows the source collection.
///
/// # Errors
///
/// Returns `ProviderError::MalformedResponse` for a service without a name
/// and `ProviderError::InvalidPrice` for an unusable price.
pub fn extract(tree: &Value, config: &ResponseConfig) -> ProviderResult<Vec<ServiceQuote>> {
    let services: Vec<&Value> = match resolve(tree, config.services_path()) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(map)) if !map.is_empty() => vec![single],
        _ => Vec::new(),
    };

    services
        .into_iter()
        .filter(|service| service.is_object())
        .map(|service| extract_service(service, config))
        .collect()
}

fn present<'v>(service: &'v Value, path: &str) -> Option<&'v Value> {
    resolve(service, path).filter(|value| !value.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn extract_service(service: &Value, config: &ResponseConfig) -> ProviderResult<ServiceQuote> {
    let name = present(service, config.service_name_path())
        .and_then(scalar_text)
        .ok_or_else(|| {
            ProviderError::malformed_response(format!(
                "service name missing at {:?}",
                config.service_name_path()
            ))
        })?;

    let code = present(service, config.service_code_path()).and_then(scalar_text);

    let raw_price = present(service, config.price_path()).ok_or_else(|| {
        ProviderError::invalid_price(format!("price missing at {:?}", config.price_path()))
    })?;
    let price = coerce_decimal(raw_price)
        .ok_or_else(|| ProviderError::invalid_price(format!("price {} is not numeric", raw_price)))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ProviderError::invalid_price(format!("price {} is negative", price)));
    }

    let currency = present(service, config.currency_path())
        .and_then(scalar_text)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    Ok(ServiceQuote::new(name, code, price, currency))
}
