//! # Seed Fixtures
//!
//! Demo data for a fresh in-memory deployment: four carriers, three users
//! and their pricing rules.
//!
//! Carrier endpoints are deployment specific and come from
//! [`FixtureEndpoints`].

use crate::domain::entities::{
    GlobalPricingRule, ProviderConfig, ProviderPricingRule, RequestConfig, ResponseConfig,
    ServicePricingOverride, User, WireFormat,
};
use crate::domain::value_objects::{ProviderId, UserId};
use crate::infrastructure::persistence::{
    PricingRuleRepository, ProviderRepository, RepositoryResult, UserRepository,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// Auth subject of the user with provider-level markups.
pub const RAYMUNDO_SUBJECT: &str = "user_36nPERXSExq2TITjdFGDSey8e4e";
/// Auth subject of the user with fixed-price overrides.
pub const CARLOS_SUBJECT: &str = "user_36np26Z9ac0zZwPIwEZf9m6fcU9";
/// Auth subject of the user without rules.
pub const ARMANDO_SUBJECT: &str = "user_36npDZuBTgXPYwd9z51KHdtmiNa";

/// Carrier endpoint URLs for the seeded providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureEndpoints {
    /// Estafeta rate endpoint.
    pub estafeta: String,
    /// Fedex rate endpoint.
    pub fedex: String,
    /// DHL rate endpoint.
    pub dhl: String,
    /// UPS rate endpoint.
    pub ups: String,
}

impl Default for FixtureEndpoints {
    fn default() -> Self {
        Self {
            estafeta: "http://localhost:3001/estafeta/quote".to_string(),
            fedex: "http://localhost:3001/fedex/quote".to_string(),
            dhl: "http://localhost:3001/dhl/quote".to_string(),
            ups: "http://localhost:3001/ups/quote".to_string(),
        }
    }
}

/// What [`seed`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    /// Providers created.
    pub providers: usize,
    /// Users saved.
    pub users: usize,
    /// Pricing rules saved.
    pub rules: usize,
}

/// Estafeta: nested JSON body, services under `data.quotes`.
#[must_use]
pub fn estafeta(endpoint: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderId::new(0), "Estafeta", endpoint)
        .with_request_config(
            RequestConfig::json(json!({
                "origin_zip": "{originZipCode}",
                "destination_zip": "{destinationZipCode}",
                "package": {
                    "weight_kg": "{packageWeight}",
                    "dimensions_cm": {
                        "length": "{packageLength}",
                        "width": "{packageWidth}",
                        "height": "{packageHeight}"
                    }
                }
            }))
            .with_header("Content-Type", "application/json"),
        )
        .with_response_config(
            ResponseConfig::new(WireFormat::Json)
                .with_services_path("data.quotes")
                .with_service_name_path("service_label")
                .with_service_code_path("service_code")
                .with_price_path("amount")
                .with_currency_path("currency_code"),
        )
}

/// Fedex: flat JSON body, services under `results`.
#[must_use]
pub fn fedex(endpoint: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderId::new(0), "Fedex", endpoint)
        .with_request_config(
            RequestConfig::json(json!({
                "from": "{originZipCode}",
                "to": "{destinationZipCode}",
                "weight": "{packageWeight}",
                "length": "{packageLength}",
                "width": "{packageWidth}",
                "height": "{packageHeight}"
            }))
            .with_header("Content-Type", "application/json"),
        )
        .with_response_config(ResponseConfig::new(WireFormat::Json).with_services_path("results"))
}

/// DHL: JSON body with the package size as a list.
#[must_use]
pub fn dhl(endpoint: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderId::new(0), "DHL", endpoint)
        .with_request_config(
            RequestConfig::json(json!({
                "source": { "zip": "{originZipCode}" },
                "target": { "zip": "{destinationZipCode}" },
                "parcel": {
                    "kg": "{packageWeight}",
                    "size_cm": ["{packageLength}", "{packageWidth}", "{packageHeight}"]
                }
            }))
            .with_header("Content-Type", "application/json"),
        )
        .with_response_config(
            ResponseConfig::new(WireFormat::Json)
                .with_services_path("services")
                .with_service_name_path("label")
                .with_service_code_path("id")
                .with_price_path("total")
                .with_currency_path("curr"),
        )
}

const UPS_TEMPLATE: &str = "<RateRequest>
  <ShipperPostalCode>{originZipCode}</ShipperPostalCode>
  <RecipientPostalCode>{destinationZipCode}</RecipientPostalCode>
  <Package>
    <Weight>{packageWeight}</Weight>
    <Length>{packageLength}</Length>
    <Width>{packageWidth}</Width>
    <Height>{packageHeight}</Height>
  </Package>
</RateRequest>";

/// UPS: XML request and response.
#[must_use]
pub fn ups(endpoint: &str) -> ProviderConfig {
    ProviderConfig::new(ProviderId::new(0), "UPS", endpoint)
        .with_request_config(
            RequestConfig::xml(UPS_TEMPLATE)
                .with_header("Content-Type", "application/xml")
                .with_header("Accept", "application/xml"),
        )
        .with_response_config(
            ResponseConfig::new(WireFormat::Xml)
                .with_services_path("RatedShipment")
                .with_service_name_path("Service.Description")
                .with_service_code_path("Service.Code")
                .with_price_path("TotalCharges.MonetaryValue")
                .with_currency_path("TotalCharges.CurrencyCode"),
        )
}

/// Seed users, in ID order.
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        User::new(UserId::new(1), RAYMUNDO_SUBJECT, "hello@raymundosalazar.dev")
            .with_name("Raymundo", "Salazar"),
        User::new(UserId::new(2), CARLOS_SUBJECT, "carlos.mendoza@example.com")
            .with_name("Carlos", "Mendoza"),
        User::new(UserId::new(3), ARMANDO_SUBJECT, "armando.salazar@example.com")
            .with_name("Armando", "Salazar"),
    ]
}

/// Writes every fixture into the given stores.
///
/// # Errors
///
/// Returns the first repository error encountered.
pub async fn seed(
    providers: &dyn ProviderRepository,
    users_repo: &dyn UserRepository,
    rules: &dyn PricingRuleRepository,
    endpoints: &FixtureEndpoints,
) -> RepositoryResult<SeedSummary> {
    let estafeta_id = providers.create(estafeta(&endpoints.estafeta)).await?.id();
    providers.create(fedex(&endpoints.fedex)).await?;
    let dhl_id = providers.create(dhl(&endpoints.dhl)).await?.id();
    let ups_id = providers.create(ups(&endpoints.ups)).await?.id();

    let seeded_users = users();
    for user in &seeded_users {
        users_repo.save(user).await?;
    }

    let raymundo = UserId::new(1);
    let carlos = UserId::new(2);

    rules
        .save_global(&GlobalPricingRule::new(raymundo, Some(Decimal::new(15, 0))))
        .await?;
    rules
        .save_provider_rule(&ProviderPricingRule::new(
            raymundo,
            estafeta_id,
            Some(Decimal::new(10, 0)),
        ))
        .await?;
    rules
        .save_provider_rule(&ProviderPricingRule::new(
            raymundo,
            dhl_id,
            Some(Decimal::new(18, 0)),
        ))
        .await?;

    rules
        .save_global(&GlobalPricingRule::new(carlos, Some(Decimal::new(12, 0))))
        .await?;
    rules
        .save_service_override(&ServicePricingOverride::fixed_price(
            carlos,
            estafeta_id,
            "ground",
            Decimal::new(120, 0),
        ))
        .await?;
    rules
        .save_service_override(&ServicePricingOverride::fixed_price(
            carlos,
            ups_id,
            "express",
            Decimal::new(200, 0),
        ))
        .await?;

    let summary = SeedSummary {
        providers: 4,
        users: seeded_users.len(),
        rules: 6,
    };
    info!(
        providers = summary.providers,
        users = summary.users,
        rules = summary.rules,
        "Seeded fixtures"
    );
    Ok(summary)
}
