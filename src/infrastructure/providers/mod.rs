//! # Shipping Providers
//!
//! Configuration-driven carrier integration.
//!
//! ## Pipeline
//!
//! 1. [`request_builder`]: render the request template for one shipment
//! 2. [`http_client`]: send it
//! 3. [`response_normalizer`]: parse the answer and extract services
//!
//! [`path`] and [`xml`] are shared by the pipeline stages.
//! [`generic::GenericHttpProvider`] ties the stages together behind the
//! [`traits::ShippingProvider`] port.

pub mod error;
pub mod generic;
pub mod http_client;
pub mod path;
pub mod request_builder;
pub mod response_normalizer;
pub mod traits;
pub mod xml;

pub use error::{ProviderError, ProviderResult};
pub use generic::{GenericHttpProvider, HttpProviderFactory};
pub use http_client::{HttpClient, RawResponse};
pub use request_builder::{PreparedRequest, RequestBody};
pub use traits::{ProviderFactory, ShippingProvider};
