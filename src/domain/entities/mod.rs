//! # Domain Entities
//!
//! Configuration records and quote results.
//!
//! ## Configuration
//!
//! - [`ProviderConfig`]: declarative description of a carrier
//! - [`User`]: account pricing rules are scoped to
//! - [`GlobalPricingRule`], [`ProviderPricingRule`], [`ServicePricingOverride`]: pricing rules
//!
//! ## Results
//!
//! - [`ServiceQuote`]: carrier offer before pricing
//! - [`PricedQuote`]: aggregated output row

pub mod pricing_rule;
pub mod provider;
pub mod quote;
pub mod user;

pub use pricing_rule::{
    GlobalPricingRule, PriceAdjustment, ProviderPricingRule, ServicePricingOverride,
};
pub use provider::{ProviderConfig, RequestConfig, ResponseConfig, WireFormat};
pub use quote::{PricedQuote, QuoteErrorCode, QuoteOutcome, ServiceQuote, DEFAULT_CURRENCY};
pub use user::User;
