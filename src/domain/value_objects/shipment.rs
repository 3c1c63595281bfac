//! # Shipment Request
//!
//! Trip parameters sent to every carrier: origin and destination postal
//! codes plus the package dimensions.
//!
//! # Examples
//!
//! ```
//! use shipquote::domain::value_objects::{PackageDimensions, ShipmentRequest};
//! use rust_decimal::Decimal;
//!
//! let request = ShipmentRequest::new(
//!     "64000",
//!     "03020",
//!     PackageDimensions::new(
//!         Decimal::new(15, 1),
//!         Decimal::new(20, 0),
//!         Decimal::new(15, 0),
//!         Decimal::new(10, 0),
//!     ),
//! );
//!
//! assert_eq!(request.placeholder("packageWeight").as_deref(), Some("1.5"));
//! assert!(request.placeholder("unknown").is_none());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for the origin postal code.
pub const ORIGIN_ZIP_CODE: &str = "originZipCode";
/// Placeholder for the destination postal code.
pub const DESTINATION_ZIP_CODE: &str = "destinationZipCode";
/// Placeholder for the package weight.
pub const PACKAGE_WEIGHT: &str = "packageWeight";
/// Placeholder for the package length.
pub const PACKAGE_LENGTH: &str = "packageLength";
/// Placeholder for the package width.
pub const PACKAGE_WIDTH: &str = "packageWidth";
/// Placeholder for the package height.
pub const PACKAGE_HEIGHT: &str = "packageHeight";

/// All placeholder names recognized in request templates.
pub const PLACEHOLDERS: [&str; 6] = [
    ORIGIN_ZIP_CODE,
    DESTINATION_ZIP_CODE,
    PACKAGE_WEIGHT,
    PACKAGE_LENGTH,
    PACKAGE_WIDTH,
    PACKAGE_HEIGHT,
];

/// Physical package dimensions.
///
/// Values are expected to be positive; the request-handling layer
/// validates them before a [`ShipmentRequest`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDimensions {
    /// Weight of the package.
    pub weight: Decimal,
    /// Length of the package.
    pub length: Decimal,
    /// Width of the package.
    pub width: Decimal,
    /// Height of the package.
    pub height: Decimal,
}

impl PackageDimensions {
    /// Creates package dimensions.
    #[must_use]
    pub fn new(weight: Decimal, length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            weight,
            length,
            width,
            height,
        }
    }
}

/// A quote request for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    origin_zip_code: String,
    destination_zip_code: String,
    dimensions: PackageDimensions,
}

impl ShipmentRequest {
    /// Creates a new shipment request.
    #[must_use]
    pub fn new(
        origin_zip_code: impl Into<String>,
        destination_zip_code: impl Into<String>,
        dimensions: PackageDimensions,
    ) -> Self {
        Self {
            origin_zip_code: origin_zip_code.into(),
            destination_zip_code: destination_zip_code.into(),
            dimensions,
        }
    }

    /// Returns the origin postal code.
    #[inline]
    #[must_use]
    pub fn origin_zip_code(&self) -> &str {
        &self.origin_zip_code
    }

    /// Returns the destination postal code.
    #[inline]
    #[must_use]
    pub fn destination_zip_code(&self) -> &str {
        &self.destination_zip_code
    }

    /// Returns the package dimensions.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &PackageDimensions {
        &self.dimensions
    }

    /// Returns the substitution value for a template placeholder.
    ///
    /// Returns `None` when `name` is not one of [`PLACEHOLDERS`].
    #[must_use]
    pub fn placeholder(&self, name: &str) -> Option<String> {
        match name {
            ORIGIN_ZIP_CODE => Some(self.origin_zip_code.clone()),
            DESTINATION_ZIP_CODE => Some(self.destination_zip_code.clone()),
            PACKAGE_WEIGHT => Some(self.dimensions.weight.to_string()),
            PACKAGE_LENGTH => Some(self.dimensions.length.to_string()),
            PACKAGE_WIDTH => Some(self.dimensions.width.to_string()),
            PACKAGE_HEIGHT => Some(self.dimensions.height.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for ShipmentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shipment({} -> {}, {}kg)",
            self.origin_zip_code, self.destination_zip_code, self.dimensions.weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ShipmentRequest {
        ShipmentRequest::new(
            "64000",
            "03020",
            PackageDimensions::new(
                Decimal::new(15, 1),
                Decimal::new(200, 1),
                Decimal::new(15, 0),
                Decimal::new(10, 0),
            ),
        )
    }

    #[test]
    fn every_placeholder_resolves() {
        let request = request();
        for name in PLACEHOLDERS {
            assert!(request.placeholder(name).is_some(), "{name} should resolve");
        }
    }

    #[test]
    fn decimal_placeholders_keep_scale() {
        let request = request();
        assert_eq!(request.placeholder(PACKAGE_LENGTH).as_deref(), Some("20.0"));
        assert_eq!(request.placeholder(PACKAGE_HEIGHT).as_deref(), Some("10"));
    }

    #[test]
    fn placeholder_names_are_case_sensitive() {
        assert!(request().placeholder("originZipcode").is_none());
    }

    #[test]
    fn display() {
        assert_eq!(request().to_string(), "Shipment(64000 -> 03020, 1.5kg)");
    }
}
