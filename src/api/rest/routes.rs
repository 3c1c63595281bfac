//! # REST Routes
//!
//! Router assembly for the `/api` surface.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Builds the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/quotes", post(handlers::get_quotes))
        .route(
            "/shipping-providers",
            get(handlers::list_providers).post(handlers::create_provider),
        )
        .route(
            "/shipping-providers/{id}",
            get(handlers::get_provider)
                .put(handlers::update_provider)
                .patch(handlers::update_provider)
                .delete(handlers::delete_provider),
        )
        .route("/users", get(handlers::list_users))
        .route("/users/me", get(handlers::current_user))
        .route("/users/{id}", get(handlers::get_user))
        .method_not_allowed_fallback(handlers::method_not_allowed);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
