//! # Persistence Layer
//!
//! Repository ports and their in-memory implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`ProviderRepository`]: carrier configurations
//! - [`PricingRuleRepository`]: pricing rules
//! - [`UserRepository`]: user accounts
//!
//! ## Implementations
//!
//! - `in_memory`: process-local storage

pub mod in_memory;
pub mod traits;

pub use traits::{
    PricingRuleRepository, ProviderRepository, RepositoryError, RepositoryResult, UserRepository,
};
