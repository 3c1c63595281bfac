//! # Infrastructure Layer
//!
//! Adapters for the outside world.
//!
//! - [`providers`]: configuration-driven carrier HTTP adapters
//! - [`persistence`]: repository ports and in-memory stores
//! - [`fixtures`]: demo carriers, users and pricing rules

pub mod fixtures;
pub mod persistence;
pub mod providers;
