//! # Shipping Provider Trait
//!
//! Port definition for carrier integrations.
//!
//! Every carrier sits behind [`ShippingProvider`], and the quote
//! orchestrator turns stored [`ProviderConfig`]s into providers through a
//! [`ProviderFactory`]. The only production implementation is the
//! configuration-driven
//! [`GenericHttpProvider`](crate::infrastructure::providers::generic::GenericHttpProvider);
//! tests plug in scripted providers through the same seams.
//!
//! # Examples
//!
//! ```ignore
//! use shipquote::infrastructure::providers::traits::ShippingProvider;
//!
//! #[derive(Debug)]
//! struct FlatRate;
//!
//! #[async_trait::async_trait]
//! impl ShippingProvider for FlatRate {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::{ProviderConfig, ServiceQuote};
use crate::domain::value_objects::{ProviderId, ShipmentRequest};
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Trait defining the interface for carrier adapters.
///
/// # Error Handling
///
/// Implementations propagate failures instead of swallowing them; the
/// caller decides how a failed carrier shows up in the aggregate. Transport
/// failures must map to the transport variants of
/// [`ProviderError`](crate::infrastructure::providers::error::ProviderError).
#[async_trait]
pub trait ShippingProvider: Send + Sync + fmt::Debug {
    /// Returns the provider ID.
    fn provider_id(&self) -> ProviderId;

    /// Returns the provider display name.
    fn name(&self) -> &str;

    /// Requests rates for one shipment.
    ///
    /// Returns the carrier's services in the carrier's order. An empty list
    /// means the carrier answered but offered nothing.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the carrier cannot be reached, or a
    /// processing error if the request cannot be built or the answer
    /// cannot be normalized.
    async fn quote(&self, shipment: &ShipmentRequest) -> ProviderResult<Vec<ServiceQuote>>;
}

/// Builds providers from stored configuration.
pub trait ProviderFactory: Send + Sync + fmt::Debug {
    /// Creates the provider for `config`.
    fn create(&self, config: &ProviderConfig) -> Arc<dyn ShippingProvider>;
}
