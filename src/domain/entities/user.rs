//! # User Entity
//!
//! Account that pricing rules are scoped to.

use crate::domain::value_objects::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user account.
///
/// `auth_subject` is the identity-provider subject a verified bearer token
/// resolves to; it is unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    auth_subject: String,
    email: String,
    name: Option<String>,
    last_name: Option<String>,
}

impl User {
    /// Creates a new user.
    #[must_use]
    pub fn new(id: UserId, auth_subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            auth_subject: auth_subject.into(),
            email: email.into(),
            name: None,
            last_name: None,
        }
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.last_name = Some(last_name.into());
        self
    }

    /// Returns the user ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the identity-provider subject.
    #[inline]
    #[must_use]
    pub fn auth_subject(&self) -> &str {
        &self.auth_subject
    }

    /// Returns the email address.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the first name, if known.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the last name, if known.
    #[inline]
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User({}: {})", self.id, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_names() {
        let user = User::new(UserId::new(1), "user_abc", "a@example.com").with_name("Ana", "Ruiz");
        assert_eq!(user.name(), Some("Ana"));
        assert_eq!(user.last_name(), Some("Ruiz"));
        assert_eq!(user.auth_subject(), "user_abc");
        assert_eq!(user.to_string(), "User(1: a@example.com)");
    }
}
