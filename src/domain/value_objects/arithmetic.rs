//! # Price Arithmetic
//!
//! Checked decimal arithmetic for markup computation and price coercion.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`apply_markup`] - Applies a markup percentage to a base price
//! - [`round_price`] - Half-up rounding to two decimal places
//! - [`parse_decimal`] / [`coerce_decimal`] - Lenient numeric coercion
//!
//! # Examples
//!
//! ```
//! use shipquote::domain::value_objects::arithmetic::apply_markup;
//! use rust_decimal::Decimal;
//!
//! let final_price = apply_markup(Decimal::new(1000, 1), Decimal::new(85, 1)).unwrap();
//! assert_eq!(final_price, Decimal::new(1085, 1));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places kept in final prices.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds a price to two decimal places, midpoints away from zero.
#[inline]
#[must_use]
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a markup percentage to a base price.
///
/// Computes `round(base * (1 + markup / 100), 2)`.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if an intermediate value overflows.
#[must_use = "this returns the marked-up price without modifying the inputs"]
pub fn apply_markup(base_price: Decimal, markup_percentage: Decimal) -> ArithmeticResult<Decimal> {
    let factor = Decimal::ONE.safe_add(markup_percentage.safe_div(Decimal::ONE_HUNDRED)?)?;
    Ok(round_price(base_price.safe_mul(factor)?))
}

/// Parses a decimal from text, accepting plain and scientific notation.
///
/// Surrounding whitespace is ignored. Returns `None` for anything else.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Coerces a JSON value into a decimal.
///
/// Numbers convert directly; strings are parsed with [`parse_decimal`].
/// Every other kind yields `None`.
#[must_use]
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text),
        _ => None,
    }
}
