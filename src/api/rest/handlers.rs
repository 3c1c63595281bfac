//! # REST Handlers
//!
//! Request handlers for the quote, provider, user and health endpoints.
//!
//! Bodies are read as raw bytes and parsed here so malformed JSON surfaces
//! as the API's own error envelope rather than an extractor rejection.

use crate::api::rest::auth::CurrentUser;
use crate::application::error::{
    ApplicationError, ApplicationResult, INVALID_DIMENSIONS, INVALID_PARAMS,
};
use crate::application::services::QuoteAggregationEngine;
use crate::domain::entities::{PricedQuote, ProviderConfig, RequestConfig, ResponseConfig, User};
use crate::domain::value_objects::{
    PackageDimensions, ProviderId, ShipmentRequest, UserId, coerce_decimal,
};
use crate::infrastructure::persistence::{ProviderRepository, UserRepository};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Shared state for every handler.
#[derive(Debug)]
pub struct AppState {
    /// Quote orchestrator.
    pub engine: QuoteAggregationEngine,
    /// Provider store.
    pub providers: Arc<dyn ProviderRepository>,
    /// User store.
    pub users: Arc<dyn UserRepository>,
    /// CRUD operations enabled on the provider resource.
    pub provider_operations: EnabledOperations,
}

/// A CRUD operation on a REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudOperation {
    /// List every record.
    FindAll,
    /// Fetch one record by primary key.
    FindByPk,
    /// Create a record.
    Create,
    /// Update a record.
    Update,
    /// Delete a record.
    Delete,
}

impl CrudOperation {
    /// Every operation, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::FindAll,
        Self::FindByPk,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// Returns the operation's configuration name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindAll => "find_all",
            Self::FindByPk => "find_by_pk",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of operations a resource accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledOperations(Vec<CrudOperation>);

impl EnabledOperations {
    /// Enables every operation.
    #[must_use]
    pub fn all() -> Self {
        Self(CrudOperation::ALL.to_vec())
    }

    /// Enables only the given operations.
    #[must_use]
    pub fn only(operations: impl IntoIterator<Item = CrudOperation>) -> Self {
        let mut enabled = Vec::new();
        for operation in operations {
            if !enabled.contains(&operation) {
                enabled.push(operation);
            }
        }
        Self(enabled)
    }

    /// Returns true if `operation` is enabled.
    #[must_use]
    pub fn contains(&self, operation: CrudOperation) -> bool {
        self.0.contains(&operation)
    }

    /// Fails with `METHOD_NOT_ALLOWED` unless `operation` is enabled.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::MethodNotAllowed` listing the enabled
    /// operations.
    pub fn require(&self, operation: CrudOperation) -> ApplicationResult<()> {
        if self.contains(operation) {
            return Ok(());
        }
        Err(ApplicationError::method_not_allowed(
            operation.as_str(),
            self.0.iter().map(CrudOperation::as_str),
        ))
    }
}

impl Default for EnabledOperations {
    fn default() -> Self {
        Self::all()
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Success envelope for resource endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Response payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload.
    #[must_use]
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Body of a successful quote request.
#[derive(Debug, Clone, Serialize)]
pub struct QuotesResponse {
    /// Priced rows and error placeholders, in provider order.
    pub quotes: Vec<PricedQuote>,
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

// ============================================================================
// Quotes
// ============================================================================

const QUOTE_FIELDS: [&str; 4] = [
    "originZipCode",
    "destinationZipCode",
    "packageDimensions",
    "providerId",
];

const DIMENSIONS: [&str; 4] = ["weight", "length", "width", "height"];

/// Values a client may send that count as "not provided".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn zip_code(value: &Value, field: &str) -> ApplicationResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(ApplicationError::bad_request_with_code(
            INVALID_PARAMS,
            format!("{field} must be a string"),
        )),
    }
}

fn dimension(dimensions: &Value, name: &str) -> ApplicationResult<Decimal> {
    let value = dimensions
        .get(name)
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApplicationError::missing_params([format!("packageDimensions.{name}")]))?;

    let parsed = coerce_decimal(value).ok_or_else(|| {
        ApplicationError::bad_request_with_code(
            INVALID_PARAMS,
            format!("packageDimensions.{name} must be numeric"),
        )
    })?;

    if parsed <= Decimal::ZERO {
        return Err(ApplicationError::bad_request_with_code(
            INVALID_DIMENSIONS,
            format!("packageDimensions.{name} must be greater than zero"),
        ));
    }
    Ok(parsed)
}

fn provider_id(value: &Value) -> ApplicationResult<ProviderId> {
    let id = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.map(ProviderId::new).ok_or_else(|| {
        ApplicationError::bad_request_with_code(INVALID_PARAMS, "providerId must be an integer")
    })
}

/// Validates a quote request body.
///
/// # Errors
///
/// Returns `MISSING_PARAMS` for an unreadable body or absent fields, and
/// `BAD_REQUEST` with `INVALID_PARAMS` or `INVALID_DIMENSIONS` for values
/// of the wrong type or sign.
pub fn parse_quote_request(body: &[u8]) -> ApplicationResult<(ShipmentRequest, ProviderId)> {
    let data: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    if is_blank(&data) {
        return Err(ApplicationError::missing_params(["Invalid JSON body"]));
    }

    let fields: Vec<&Value> = QUOTE_FIELDS
        .iter()
        .filter_map(|field| data.get(field).filter(|value| !is_blank(value)))
        .collect();
    let [origin, destination, dimensions, provider] = fields.as_slice() else {
        return Err(ApplicationError::missing_params(QUOTE_FIELDS));
    };

    let mut values = [Decimal::ZERO; 4];
    for (slot, name) in values.iter_mut().zip(DIMENSIONS) {
        *slot = dimension(dimensions, name)?;
    }
    let [weight, length, width, height] = values;

    let shipment = ShipmentRequest::new(
        zip_code(origin, "originZipCode")?,
        zip_code(destination, "destinationZipCode")?,
        PackageDimensions::new(weight, length, width, height),
    );
    Ok((shipment, provider_id(provider)?))
}

/// `POST /api/quotes`
///
/// # Errors
///
/// Returns a validation error for a bad body, or `NOT_FOUND` when no
/// provider produced anything.
pub async fn get_quotes(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Bytes,
) -> ApplicationResult<Json<QuotesResponse>> {
    let (shipment, provider_id) = parse_quote_request(&body)?;

    let quotes = state
        .engine
        .get_quotes(&shipment, user.id(), Some(provider_id))
        .await?;

    if quotes.is_empty() {
        return Err(ApplicationError::not_found(
            "No quotes available for the given parameters",
        ));
    }
    Ok(Json(QuotesResponse { quotes }))
}

// ============================================================================
// Providers
// ============================================================================

type FieldMutator = fn(&mut ProviderConfig, Value) -> Result<(), serde_json::Error>;

fn set_name(provider: &mut ProviderConfig, value: Value) -> Result<(), serde_json::Error> {
    provider.set_name(serde_json::from_value::<String>(value)?);
    Ok(())
}

fn set_active(provider: &mut ProviderConfig, value: Value) -> Result<(), serde_json::Error> {
    provider.set_active(serde_json::from_value::<bool>(value)?);
    Ok(())
}

fn set_endpoint_url(provider: &mut ProviderConfig, value: Value) -> Result<(), serde_json::Error> {
    provider.set_endpoint_url(serde_json::from_value::<String>(value)?);
    Ok(())
}

fn set_request_config(
    provider: &mut ProviderConfig,
    value: Value,
) -> Result<(), serde_json::Error> {
    provider.set_request_config(serde_json::from_value::<RequestConfig>(value)?);
    Ok(())
}

fn set_response_config(
    provider: &mut ProviderConfig,
    value: Value,
) -> Result<(), serde_json::Error> {
    provider.set_response_config(serde_json::from_value::<ResponseConfig>(value)?);
    Ok(())
}

/// Writable provider fields and their mutators.
const PROVIDER_FIELDS: [(&str, FieldMutator); 5] = [
    ("name", set_name),
    ("active", set_active),
    ("endpointUrl", set_endpoint_url),
    ("requestConfig", set_request_config),
    ("responseConfig", set_response_config),
];

/// Fields a new provider must carry.
const PROVIDER_REQUIRED: [&str; 2] = ["name", "endpointUrl"];

/// Applies every writable field present in `data`.
///
/// Unknown fields are ignored.
///
/// # Errors
///
/// Returns `INVALID_FIELD` for a field whose value has the wrong shape.
pub fn hydrate_provider(
    provider: &mut ProviderConfig,
    data: &Map<String, Value>,
) -> ApplicationResult<()> {
    for (field, mutate) in PROVIDER_FIELDS {
        if let Some(value) = data.get(field) {
            mutate(provider, value.clone()).map_err(|_| ApplicationError::invalid_field(field))?;
        }
    }
    Ok(())
}

fn json_object(body: &[u8]) -> ApplicationResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApplicationError::invalid_json("Invalid JSON body")),
    }
}

fn parse_id(raw: &str) -> ApplicationResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApplicationError::bad_request(format!("Invalid ID: {raw}")))
}

async fn find_provider(state: &AppState, raw_id: &str) -> ApplicationResult<ProviderConfig> {
    let id = ProviderId::new(parse_id(raw_id)?);
    state
        .providers
        .get(id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Resource not found"))
}

/// `GET /api/shipping-providers`
///
/// # Errors
///
/// Returns `METHOD_NOT_ALLOWED` if listing is disabled.
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    state.provider_operations.require(CrudOperation::FindAll)?;
    let items = state.providers.get_all().await?;
    Ok(ApiResponse::ok(json!({ "items": items })))
}

/// `GET /api/shipping-providers/{id}`
///
/// # Errors
///
/// Returns `NOT_FOUND` for an unknown ID.
pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    state.provider_operations.require(CrudOperation::FindByPk)?;
    let item = find_provider(&state, &id).await?;
    Ok(ApiResponse::ok(json!({ "item": item })))
}

/// `POST /api/shipping-providers`
///
/// # Errors
///
/// Returns `INVALID_JSON`, `MISSING_PARAMS` or `INVALID_FIELD` for a bad
/// body.
pub async fn create_provider(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    state.provider_operations.require(CrudOperation::Create)?;
    let data = json_object(&body)?;

    let missing: Vec<&str> = PROVIDER_REQUIRED
        .into_iter()
        .filter(|field| data.get(*field).is_none_or(is_blank))
        .collect();
    if !missing.is_empty() {
        return Err(ApplicationError::missing_params(missing));
    }

    let mut provider = ProviderConfig::new(ProviderId::new(0), "", "");
    hydrate_provider(&mut provider, &data)?;
    let item = state.providers.create(provider).await?;

    tracing::info!(provider_id = item.id().get(), name = item.name(), "Provider created");
    Ok(ApiResponse::ok(json!({ "item": item })))
}

/// `PUT|PATCH /api/shipping-providers/{id}`
///
/// # Errors
///
/// Returns `NOT_FOUND` for an unknown ID, or a validation error for a bad
/// body.
pub async fn update_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    state.provider_operations.require(CrudOperation::Update)?;
    let mut item = find_provider(&state, &id).await?;
    let data = json_object(&body)?;

    hydrate_provider(&mut item, &data)?;
    state.providers.save(&item).await?;

    tracing::info!(provider_id = item.id().get(), "Provider updated");
    Ok(ApiResponse::ok(json!({ "item": item })))
}

/// `DELETE /api/shipping-providers/{id}`
///
/// # Errors
///
/// Returns `NOT_FOUND` for an unknown ID.
pub async fn delete_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    state.provider_operations.require(CrudOperation::Delete)?;
    let item = find_provider(&state, &id).await?;
    state.providers.delete(item.id()).await?;

    tracing::info!(provider_id = item.id().get(), "Provider deleted");
    Ok(ApiResponse::ok(json!({ "deleted": true, "id": item.id() })))
}

// ============================================================================
// Users
// ============================================================================

/// `GET /api/users`
///
/// # Errors
///
/// Returns an internal error if the user store fails.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    let items = state.users.get_all().await?;
    Ok(ApiResponse::ok(json!({ "items": items })))
}

/// `GET /api/users/{id}`
///
/// # Errors
///
/// Returns `NOT_FOUND` for an unknown ID.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApplicationResult<Json<ApiResponse<Value>>> {
    let id = UserId::new(parse_id(&id)?);
    let item = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Resource not found"))?;
    Ok(ApiResponse::ok(json!({ "item": item })))
}

/// `GET /api/users/me`
///
/// # Errors
///
/// Returns `AUTH_NOT_AUTHENTICATED` for anonymous requests.
pub async fn current_user(user: CurrentUser) -> ApplicationResult<Json<ApiResponse<User>>> {
    Ok(ApiResponse::ok(user.require()?))
}

// ============================================================================
// Health & Fallbacks
// ============================================================================

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Answers a known path with an unsupported method.
pub async fn method_not_allowed(method: Method) -> ApplicationError {
    ApplicationError::method_not_allowed(method.as_str(), Vec::<String>::new())
}

/// Answers an unknown path.
pub async fn not_found() -> ApplicationError {
    ApplicationError::not_found("Route not found")
}
