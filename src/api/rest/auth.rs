//! # Current User
//!
//! Resolves the caller from an `Authorization: Bearer <subject>` header.
//!
//! Token verification happens upstream: the bearer value is taken as an
//! already-verified auth subject and looked up in the user store. Requests
//! without a bearer header are anonymous.

use crate::api::rest::handlers::AppState;
use crate::application::error::ApplicationError;
use crate::domain::entities::User;
use crate::domain::value_objects::UserId;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated user, or `None` for anonymous requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    /// Returns the user ID, if authenticated.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.0.as_ref().map(User::id)
    }

    /// Returns the user or an `AUTH_NOT_AUTHENTICATED` error.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Unauthorized` for anonymous requests.
    pub fn require(self) -> Result<User, ApplicationError> {
        self.0.ok_or_else(ApplicationError::not_authenticated)
    }
}

/// Extracts the bearer subject, if the header carries one.
fn bearer_subject(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApplicationError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(subject) = bearer_subject(parts) else {
            return Ok(Self(None));
        };
        if subject.is_empty() {
            return Err(ApplicationError::unauthorized("Missing bearer token"));
        }

        match state.users.find_by_auth_subject(subject).await? {
            Some(user) => Ok(Self(Some(user))),
            None => {
                tracing::debug!(subject, "Unknown auth subject");
                Err(ApplicationError::unauthorized("Invalid token: user not found"))
            }
        }
    }
}
