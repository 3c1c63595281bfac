//! # Generic HTTP Provider
//!
//! Configuration-driven carrier adapter.
//!
//! One [`GenericHttpProvider`] serves any carrier: the request is rendered
//! from the provider's [`RequestConfig`](crate::domain::entities::RequestConfig),
//! sent with the shared [`HttpClient`], and the answer is normalized with
//! the provider's [`ResponseConfig`](crate::domain::entities::ResponseConfig).

use crate::domain::entities::{ProviderConfig, ServiceQuote};
use crate::domain::value_objects::{ProviderId, ShipmentRequest};
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::request_builder;
use crate::infrastructure::providers::response_normalizer;
use crate::infrastructure::providers::traits::{ProviderFactory, ShippingProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Carrier adapter driven entirely by a [`ProviderConfig`].
#[derive(Debug, Clone)]
pub struct GenericHttpProvider {
    config: ProviderConfig,
    client: HttpClient,
}

impl GenericHttpProvider {
    /// Creates an adapter for `config` sharing `client`.
    #[must_use]
    pub fn new(config: ProviderConfig, client: HttpClient) -> Self {
        Self { config, client }
    }

    /// Returns the provider configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ShippingProvider for GenericHttpProvider {
    fn provider_id(&self) -> ProviderId {
        self.config.id()
    }

    fn name(&self) -> &str {
        self.config.name()
    }

    async fn quote(&self, shipment: &ShipmentRequest) -> ProviderResult<Vec<ServiceQuote>> {
        let request = request_builder::prepare(self.config.request_config(), shipment)?;

        debug!(
            provider = %self.config.name(),
            method = %request.method,
            url = %self.config.endpoint_url(),
            format = %self.config.request_config().format(),
            "Sending carrier request"
        );

        let response = self
            .client
            .send(
                request.method,
                self.config.endpoint_url(),
                request.headers,
                request.body,
            )
            .await?;

        if response.status.is_success() {
            debug!(provider = %self.config.name(), status = %response.status, "Carrier responded");
        } else {
            warn!(
                provider = %self.config.name(),
                status = %response.status,
                "Carrier responded with non-success status"
            );
        }

        response_normalizer::parse(&response.body, self.config.response_config())
    }
}

/// Factory producing [`GenericHttpProvider`]s over one shared client.
#[derive(Debug, Clone)]
pub struct HttpProviderFactory {
    client: HttpClient,
}

impl HttpProviderFactory {
    /// Creates a factory sharing `client`.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, config: &ProviderConfig) -> Arc<dyn ShippingProvider> {
        Arc::new(GenericHttpProvider::new(config.clone(), self.client.clone()))
    }
}
