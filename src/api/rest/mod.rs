//! # REST API
//!
//! HTTP surface of the quoting service, built on axum.
//!
//! # Endpoints
//!
//! ## Quotes
//! - `POST /api/quotes` - Quote a shipment against one provider
//!
//! ## Providers
//! - `GET /api/shipping-providers` - List providers
//! - `GET /api/shipping-providers/{id}` - Get provider by ID
//! - `POST /api/shipping-providers` - Create provider
//! - `PUT|PATCH /api/shipping-providers/{id}` - Update provider
//! - `DELETE /api/shipping-providers/{id}` - Delete provider
//!
//! ## Users
//! - `GET /api/users` - List users
//! - `GET /api/users/me` - Current user
//! - `GET /api/users/{id}` - Get user by ID
//!
//! ## Health
//! - `GET /api/health` - Health check endpoint
//!
//! Resource endpoints answer `{"success": true, "data": ...}`; every error
//! uses the envelope in [`error`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;

pub use auth::CurrentUser;
pub use error::{ErrorBody, ErrorResponse};
pub use handlers::{
    ApiResponse, AppState, CrudOperation, EnabledOperations, HealthResponse, QuotesResponse,
};
pub use routes::create_router;
