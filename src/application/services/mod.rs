//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`QuoteAggregationEngine`]: concurrent carrier quoting and pricing

pub mod quote_aggregation;

pub use quote_aggregation::{AggregationConfig, QuoteAggregationEngine};
