//! # Domain Layer
//!
//! Carrier configuration, pricing rules, quotes and the pricing cascade.

pub mod entities;
pub mod services;
pub mod value_objects;
