//! # Domain Services
//!
//! Domain services encapsulating business logic that doesn't naturally
//! belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`pricing::PricingResolver`]: rule cascade from base price to final price

pub mod pricing;

pub use pricing::{
    Pricing, PricingContext, PricingError, PricingResolver, PricingResult, PricingRuleLookup,
    PricingScope, PricingSource, DEFAULT_MARKUP_PERCENTAGE,
};
