//! # Quote Aggregation Engine
//!
//! Fans a shipment out to every eligible carrier and merges the priced
//! results.
//!
//! Each provider runs in its own task under a per-provider timeout. A
//! provider that fails, times out, or panics contributes a single error
//! placeholder row and never affects its siblings. Output follows provider
//! selection order, not completion order.
//!
//! Dropping the future returned by [`QuoteAggregationEngine::get_quotes`]
//! aborts every in-flight provider task.

use crate::application::error::ApplicationResult;
use crate::domain::entities::{PricedQuote, ProviderConfig, QuoteErrorCode, ServiceQuote};
use crate::domain::services::pricing::{PricingResolver, PricingResult};
use crate::domain::value_objects::{ProviderId, ShipmentRequest, UserId};
use crate::infrastructure::persistence::ProviderRepository;
use crate::infrastructure::providers::{ProviderFactory, ShippingProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Default per-provider ceiling in milliseconds.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5000;

/// Configuration for quote aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Per-provider timeout in milliseconds, covering the carrier call and
    /// pricing.
    pub per_provider_timeout_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            per_provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

impl AggregationConfig {
    /// Sets the per-provider timeout.
    #[must_use]
    pub fn with_per_provider_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_provider_timeout_ms = timeout_ms;
        self
    }
}

/// Collects carrier quotes concurrently and prices them per user.
#[derive(Debug)]
pub struct QuoteAggregationEngine {
    providers: Arc<dyn ProviderRepository>,
    factory: Arc<dyn ProviderFactory>,
    pricing: PricingResolver,
    config: AggregationConfig,
}

impl QuoteAggregationEngine {
    /// Creates a new engine with default configuration.
    #[must_use]
    pub fn new(
        providers: Arc<dyn ProviderRepository>,
        factory: Arc<dyn ProviderFactory>,
        pricing: PricingResolver,
    ) -> Self {
        Self {
            providers,
            factory,
            pricing,
            config: AggregationConfig::default(),
        }
    }

    /// Sets the aggregation configuration.
    #[must_use]
    pub fn with_config(mut self, config: AggregationConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the aggregation configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the pricing resolver.
    #[inline]
    #[must_use]
    pub fn pricing(&self) -> &PricingResolver {
        &self.pricing
    }

    /// Quotes a shipment against the selected providers.
    ///
    /// With `provider_id` set only that provider is asked, and only if it
    /// exists and is active. Otherwise every active provider is asked. An
    /// empty result means nothing was eligible.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if provider selection fails.
    /// Provider-level failures become placeholder rows instead.
    pub async fn get_quotes(
        &self,
        shipment: &ShipmentRequest,
        user_id: Option<UserId>,
        provider_id: Option<ProviderId>,
    ) -> ApplicationResult<Vec<PricedQuote>> {
        let selected = self.select_providers(provider_id).await?;
        if selected.is_empty() {
            debug!(provider_id = ?provider_id, "No eligible providers");
            return Ok(Vec::new());
        }

        debug!(providers = selected.len(), "Collecting quotes");
        let per_provider_timeout = Duration::from_millis(self.config.per_provider_timeout_ms);
        let mut tasks = JoinSet::new();

        for (index, config) in selected.iter().enumerate() {
            let provider = self.factory.create(config);
            let pricing = self.pricing.clone();
            let shipment = shipment.clone();

            tasks.spawn(async move {
                let rows = match timeout(
                    per_provider_timeout,
                    quote_provider(provider.as_ref(), &pricing, &shipment, user_id),
                )
                .await
                {
                    Ok(rows) => rows,
                    Err(_) => {
                        error!(
                            provider = provider.name(),
                            provider_id = provider.provider_id().get(),
                            error = "provider timed out",
                            "Provider unavailable"
                        );
                        vec![placeholder(provider.as_ref(), QuoteErrorCode::ProviderUnavailable)]
                    }
                };
                (index, rows)
            });
        }

        let mut slots: Vec<Option<Vec<PricedQuote>>> = selected.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, rows)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(rows);
                    }
                }
                Err(e) => error!(error = %e, "Provider task panicked"),
            }
        }

        Ok(selected
            .iter()
            .zip(slots)
            .flat_map(|(config, slot)| {
                slot.unwrap_or_else(|| {
                    vec![PricedQuote::failed(
                        config.name(),
                        config.id(),
                        QuoteErrorCode::ProviderError,
                    )]
                })
            })
            .collect())
    }

    async fn select_providers(
        &self,
        provider_id: Option<ProviderId>,
    ) -> ApplicationResult<Vec<ProviderConfig>> {
        let selected = match provider_id {
            Some(id) => self
                .providers
                .get(id)
                .await?
                .filter(ProviderConfig::is_active)
                .into_iter()
                .collect(),
            None => self.providers.find_active().await?,
        };
        Ok(selected)
    }
}

/// Runs one provider unit: carrier call, then pricing of every service.
async fn quote_provider(
    provider: &dyn ShippingProvider,
    pricing: &PricingResolver,
    shipment: &ShipmentRequest,
    user_id: Option<UserId>,
) -> Vec<PricedQuote> {
    let services = match provider.quote(shipment).await {
        Ok(services) => services,
        Err(e) => {
            error!(
                provider = provider.name(),
                provider_id = provider.provider_id().get(),
                error = %e,
                "Provider quote failed"
            );
            return vec![placeholder(provider, e.error_code())];
        }
    };

    if services.is_empty() {
        warn!(
            provider = provider.name(),
            provider_id = provider.provider_id().get(),
            "Provider returned no services"
        );
        return vec![placeholder(provider, QuoteErrorCode::ProviderNoServices)];
    }

    match price_services(provider, pricing, services, user_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(
                provider = provider.name(),
                provider_id = provider.provider_id().get(),
                error = %e,
                "Provider pricing failed"
            );
            vec![placeholder(provider, QuoteErrorCode::ProviderError)]
        }
    }
}

async fn price_services(
    provider: &dyn ShippingProvider,
    pricing: &PricingResolver,
    services: Vec<ServiceQuote>,
    user_id: Option<UserId>,
) -> PricingResult<Vec<PricedQuote>> {
    let mut rows = Vec::with_capacity(services.len());
    for service in services {
        let priced = pricing
            .price(
                user_id,
                provider.provider_id(),
                service.service_code(),
                service.base_price(),
            )
            .await?;
        rows.push(PricedQuote::priced(
            provider.name(),
            provider.provider_id(),
            service,
            priced.markup_percentage,
            priced.final_price,
        ));
    }
    Ok(rows)
}

fn placeholder(provider: &dyn ShippingProvider, code: QuoteErrorCode) -> PricedQuote {
    PricedQuote::failed(provider.name(), provider.provider_id(), code)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::entities::{GlobalPricingRule, ProviderPricingRule, ServicePricingOverride};
    use crate::domain::value_objects::PackageDimensions;
    use crate::infrastructure::persistence::in_memory::{
        InMemoryPricingRuleRepository, InMemoryProviderRepository,
    };
    use crate::domain::services::{PricingError, PricingResult, PricingRuleLookup};
    use crate::infrastructure::persistence::PricingRuleRepository;
    use crate::infrastructure::providers::{ProviderError, ProviderResult};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum Behavior {
        Services(Vec<ServiceQuote>),
        Fail(ProviderError),
        Panic,
    }

    #[derive(Debug)]
    struct MockProvider {
        id: ProviderId,
        name: String,
        behavior: Behavior,
        delay_ms: u64,
    }

    impl MockProvider {
        fn new(config: &ProviderConfig, behavior: Behavior, delay_ms: u64) -> Self {
            Self {
                id: config.id(),
                name: config.name().to_string(),
                behavior,
                delay_ms,
            }
        }
    }

    #[async_trait]
    impl ShippingProvider for MockProvider {
        fn provider_id(&self) -> ProviderId {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        async fn quote(&self, _shipment: &ShipmentRequest) -> ProviderResult<Vec<ServiceQuote>> {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            match &self.behavior {
                Behavior::Services(services) => Ok(services.clone()),
                Behavior::Fail(e) => Err(e.clone()),
                Behavior::Panic => panic!("carrier adapter blew up"),
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockFactory {
        behaviors: Mutex<HashMap<ProviderId, (Behavior, u64)>>,
        created: Mutex<Vec<ProviderId>>,
    }

    impl MockFactory {
        fn set(&self, id: ProviderId, behavior: Behavior, delay_ms: u64) {
            self.behaviors
                .lock()
                .unwrap()
                .insert(id, (behavior, delay_ms));
        }

        fn created(&self) -> Vec<ProviderId> {
            self.created.lock().unwrap().clone()
        }
    }

    impl ProviderFactory for MockFactory {
        fn create(&self, config: &ProviderConfig) -> Arc<dyn ShippingProvider> {
            self.created.lock().unwrap().push(config.id());
            let (behavior, delay_ms) = self
                .behaviors
                .lock()
                .unwrap()
                .get(&config.id())
                .cloned()
                .unwrap_or((Behavior::Services(Vec::new()), 0));
            Arc::new(MockProvider::new(config, behavior, delay_ms))
        }
    }

    #[derive(Debug)]
    struct BrokenRules;

    #[async_trait]
    impl PricingRuleLookup for BrokenRules {
        async fn find_global(&self, _user_id: UserId) -> PricingResult<Option<GlobalPricingRule>> {
            Err(PricingError::repository("rules offline"))
        }

        async fn find_provider_rule(
            &self,
            _user_id: UserId,
            _provider_id: ProviderId,
        ) -> PricingResult<Option<ProviderPricingRule>> {
            Err(PricingError::repository("rules offline"))
        }

        async fn find_service_override(
            &self,
            _user_id: UserId,
            _provider_id: ProviderId,
            _service_code: &str,
        ) -> PricingResult<Option<ServicePricingOverride>> {
            Err(PricingError::repository("rules offline"))
        }
    }

    const USER: UserId = UserId::new(3);

    struct Harness {
        providers: Arc<InMemoryProviderRepository>,
        rules: Arc<InMemoryPricingRuleRepository>,
        factory: Arc<MockFactory>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                providers: Arc::new(InMemoryProviderRepository::new()),
                rules: Arc::new(InMemoryPricingRuleRepository::new()),
                factory: Arc::new(MockFactory::default()),
            }
        }

        async fn provider(&self, name: &str, active: bool, behavior: Behavior) -> ProviderId {
            self.provider_with_delay(name, active, behavior, 0).await
        }

        async fn provider_with_delay(
            &self,
            name: &str,
            active: bool,
            behavior: Behavior,
            delay_ms: u64,
        ) -> ProviderId {
            let config = ProviderConfig::new(ProviderId::new(0), name, "http://carrier.test")
                .with_active(active);
            let created = self.providers.create(config).await.unwrap();
            self.factory.set(created.id(), behavior, delay_ms);
            created.id()
        }

        fn engine(&self) -> QuoteAggregationEngine {
            QuoteAggregationEngine::new(
                self.providers.clone(),
                self.factory.clone(),
                PricingResolver::new(self.rules.clone()),
            )
        }
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn service(name: &str, code: &str, price: i64) -> ServiceQuote {
        ServiceQuote::new(name, Some(code.to_string()), dec(price), "MXN")
    }

    fn shipment() -> ShipmentRequest {
        ShipmentRequest::new(
            "64000",
            "06600",
            PackageDimensions::new(dec(2), dec(30), dec(20), dec(10)),
        )
    }

    fn codes(rows: &[PricedQuote]) -> Vec<Option<QuoteErrorCode>> {
        rows.iter().map(PricedQuote::error_code).collect()
    }

    mod selection {
        use super::*;

        #[tokio::test]
        async fn no_providers_yields_empty() {
            let harness = Harness::new();
            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();
            assert!(rows.is_empty());
        }

        #[tokio::test]
        async fn requested_inactive_provider_yields_empty() {
            let harness = Harness::new();
            let id = harness
                .provider("Fedex", false, Behavior::Services(vec![service("Ground", "g", 100)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, Some(id))
                .await
                .unwrap();

            assert!(rows.is_empty());
            assert!(harness.factory.created().is_empty());
        }

        #[tokio::test]
        async fn requested_missing_provider_yields_empty() {
            let harness = Harness::new();
            harness
                .provider("Fedex", true, Behavior::Services(vec![service("Ground", "g", 100)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, Some(ProviderId::new(99)))
                .await
                .unwrap();

            assert!(rows.is_empty());
        }

        #[tokio::test]
        async fn requested_provider_is_the_only_one_asked() {
            let harness = Harness::new();
            harness
                .provider("DHL", true, Behavior::Services(vec![service("Air", "a", 300)]))
                .await;
            let fedex = harness
                .provider("Fedex", true, Behavior::Services(vec![service("Ground", "g", 100)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, Some(fedex))
                .await
                .unwrap();

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].provider(), "Fedex");
            assert_eq!(harness.factory.created(), vec![fedex]);
        }

        #[tokio::test]
        async fn inactive_providers_are_skipped() {
            let harness = Harness::new();
            harness
                .provider("DHL", false, Behavior::Services(vec![service("Air", "a", 300)]))
                .await;
            harness
                .provider("Fedex", true, Behavior::Services(vec![service("Ground", "g", 100)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].provider(), "Fedex");
        }
    }

    mod isolation {
        use super::*;

        #[tokio::test]
        async fn transport_failure_becomes_single_placeholder() {
            let harness = Harness::new();
            harness
                .provider(
                    "A-carrier",
                    true,
                    Behavior::Services(vec![service("Ground", "g", 100), service("Air", "a", 200)]),
                )
                .await;
            harness
                .provider(
                    "B-carrier",
                    true,
                    Behavior::Fail(ProviderError::connection("connection refused")),
                )
                .await;
            harness
                .provider("C-carrier", true, Behavior::Services(vec![service("Eco", "e", 50)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            assert_eq!(rows.len(), 4);
            assert_eq!(
                codes(&rows),
                vec![None, None, Some(QuoteErrorCode::ProviderUnavailable), None]
            );
            let providers: Vec<&str> = rows.iter().map(PricedQuote::provider).collect();
            assert_eq!(
                providers,
                vec!["A-carrier", "A-carrier", "B-carrier", "C-carrier"]
            );
        }

        #[tokio::test]
        async fn processing_failure_becomes_provider_error() {
            let harness = Harness::new();
            harness
                .provider(
                    "Fedex",
                    true,
                    Behavior::Fail(ProviderError::malformed_response("not json")),
                )
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            assert_eq!(codes(&rows), vec![Some(QuoteErrorCode::ProviderError)]);
            assert_eq!(rows[0].provider_id(), ProviderId::new(1));
        }

        #[tokio::test]
        async fn empty_service_list_becomes_no_services() {
            let harness = Harness::new();
            harness
                .provider("Fedex", true, Behavior::Services(Vec::new()))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            assert_eq!(codes(&rows), vec![Some(QuoteErrorCode::ProviderNoServices)]);
        }

        #[tokio::test]
        async fn panicking_provider_becomes_provider_error() {
            let harness = Harness::new();
            harness.provider("A-carrier", true, Behavior::Panic).await;
            harness
                .provider("B-carrier", true, Behavior::Services(vec![service("Eco", "e", 50)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].provider(), "A-carrier");
            assert_eq!(rows[0].error_code(), Some(QuoteErrorCode::ProviderError));
            assert_eq!(rows[1].provider(), "B-carrier");
            assert!(rows[1].error_code().is_none());
        }

        #[tokio::test]
        async fn slow_provider_times_out_as_unavailable() {
            let harness = Harness::new();
            harness
                .provider_with_delay(
                    "A-carrier",
                    true,
                    Behavior::Services(vec![service("Ground", "g", 100)]),
                    5_000,
                )
                .await;
            harness
                .provider("B-carrier", true, Behavior::Services(vec![service("Eco", "e", 50)]))
                .await;

            let engine = harness
                .engine()
                .with_config(AggregationConfig::default().with_per_provider_timeout(50));
            let rows = engine.get_quotes(&shipment(), None, None).await.unwrap();

            assert_eq!(
                codes(&rows),
                vec![Some(QuoteErrorCode::ProviderUnavailable), None]
            );
        }

        #[tokio::test]
        async fn pricing_failure_becomes_provider_error() {
            let harness = Harness::new();
            harness
                .provider("Fedex", true, Behavior::Services(vec![service("Ground", "g", 100)]))
                .await;
            let engine = QuoteAggregationEngine::new(
                harness.providers.clone(),
                harness.factory.clone(),
                PricingResolver::new(Arc::new(BrokenRules)),
            );

            let rows = engine.get_quotes(&shipment(), Some(USER), None).await.unwrap();

            assert_eq!(codes(&rows), vec![Some(QuoteErrorCode::ProviderError)]);
        }
    }

    mod ordering {
        use super::*;

        #[tokio::test]
        async fn output_follows_selection_order_not_completion_order() {
            let harness = Harness::new();
            harness
                .provider_with_delay(
                    "A-carrier",
                    true,
                    Behavior::Services(vec![service("Slow", "s", 100)]),
                    80,
                )
                .await;
            harness
                .provider("B-carrier", true, Behavior::Services(vec![service("Fast", "f", 50)]))
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            let names: Vec<&str> = rows
                .iter()
                .filter_map(|row| row.service().map(ServiceQuote::service_name))
                .collect();
            assert_eq!(names, vec!["Slow", "Fast"]);
        }

        #[tokio::test]
        async fn service_order_is_preserved_within_provider() {
            let harness = Harness::new();
            harness
                .provider(
                    "Fedex",
                    true,
                    Behavior::Services(vec![
                        service("Express", "x", 300),
                        service("Ground", "g", 100),
                        service("Saver", "s", 200),
                    ]),
                )
                .await;

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            let codes: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.service().and_then(ServiceQuote::service_code))
                .collect();
            assert_eq!(codes, vec![Some("x"), Some("g"), Some("s")]);
        }
    }

    mod pricing {
        use super::*;

        #[tokio::test]
        async fn anonymous_caller_gets_default_markup() {
            let harness = Harness::new();
            harness
                .provider("Fedex", true, Behavior::Services(vec![service("Ground", "g", 100)]))
                .await;
            harness
                .rules
                .save_global(&GlobalPricingRule::new(USER, Some(dec(50))))
                .await
                .unwrap();

            let rows = harness
                .engine()
                .get_quotes(&shipment(), None, None)
                .await
                .unwrap();

            assert_eq!(rows[0].markup_percentage(), Some(dec(15)));
            assert_eq!(rows[0].final_price(), Some(dec(115)));
        }

        #[tokio::test]
        async fn user_rules_apply_per_service() {
            let harness = Harness::new();
            let fedex = harness
                .provider(
                    "Fedex",
                    true,
                    Behavior::Services(vec![service("Ground", "g", 100), service("Air", "a", 200)]),
                )
                .await;
            harness
                .rules
                .save_provider_rule(&ProviderPricingRule::new(USER, fedex, Some(dec(10))))
                .await
                .unwrap();
            harness
                .rules
                .save_service_override(&ServicePricingOverride::fixed_price(
                    USER,
                    fedex,
                    "g",
                    dec(150),
                ))
                .await
                .unwrap();

            let rows = harness
                .engine()
                .get_quotes(&shipment(), Some(USER), None)
                .await
                .unwrap();

            assert_eq!(rows[0].final_price(), Some(dec(150)));
            assert_eq!(rows[0].markup_percentage(), Some(Decimal::ZERO));
            assert_eq!(rows[1].final_price(), Some(dec(220)));
            assert_eq!(rows[1].markup_percentage(), Some(dec(10)));
        }
    }
}
