//! # shipquote
//!
//! Shipping quote aggregator.
//!
//! A shipment (origin and destination zip codes plus package dimensions)
//! is fanned out to every active carrier. Each carrier is described by
//! configuration alone: a request template with `{placeholder}` slots and
//! dot paths locating the service list and its fields in the answer.
//! Every returned service is priced with the most specific matching rule
//! (user service override, user provider markup, global provider markup,
//! then the default markup).
//!
//! ## Layers
//!
//! - [`domain`]: configurations, rules, quotes and the pricing cascade
//! - [`application`]: the quote orchestrator and application errors
//! - [`infrastructure`]: carrier adapters, stores and seed data
//! - [`api`]: the axum REST surface
//! - [`config`] and [`telemetry`]: process setup

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
