//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`], [`UserId`]: integer-backed identifiers
//!
//! ## Trip Parameters
//!
//! - [`ShipmentRequest`]: origin, destination and [`PackageDimensions`]
//!
//! ## Arithmetic
//!
//! - [`apply_markup`]: markup application with half-up rounding
//! - [`CheckedArithmetic`]: safe decimal operations

pub mod arithmetic;
pub mod ids;
pub mod shipment;

pub use arithmetic::{
    apply_markup, coerce_decimal, parse_decimal, round_price, ArithmeticError, ArithmeticResult,
    CheckedArithmetic,
};
pub use ids::{ProviderId, UserId};
pub use shipment::{PackageDimensions, ShipmentRequest};
