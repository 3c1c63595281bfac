//! # In-Memory Repositories
//!
//! In-memory implementations backing the server and the test suite.
//!
//! ## Available Repositories
//!
//! - [`InMemoryProviderRepository`]: carrier configurations
//! - [`InMemoryPricingRuleRepository`]: pricing rules
//! - [`InMemoryUserRepository`]: user accounts
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<tokio::sync::RwLock<_>>` for shared access.

pub mod pricing_rule_repository;
pub mod provider_repository;
pub mod user_repository;

pub use pricing_rule_repository::InMemoryPricingRuleRepository;
pub use provider_repository::InMemoryProviderRepository;
pub use user_repository::InMemoryUserRepository;
