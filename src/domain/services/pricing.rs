//! # Pricing Resolver
//!
//! Domain service turning a carrier's base price into the price charged to
//! a user.
//!
//! Rules are evaluated as an ordered cascade of lookups, first match wins:
//!
//! 1. no user: default markup
//! 2. service override for (user, provider, service code): fixed price
//!    verbatim, otherwise its markup
//! 3. provider rule for (user, provider) with a markup
//! 4. global rule for the user with a markup
//! 5. default markup
//!
//! A missing rule, or a rule without a value, simply falls through to the
//! next scope.
//!
//! # Examples
//!
//! ```ignore
//! use shipquote::domain::services::pricing::PricingResolver;
//!
//! let resolver = PricingResolver::new(rules);
//! let pricing = resolver
//!     .price(Some(user_id), provider_id, Some("ground"), base_price)
//!     .await?;
//! println!("{} ({:?})", pricing.final_price, pricing.source);
//! ```

use crate::domain::entities::{
    GlobalPricingRule, PriceAdjustment, ProviderPricingRule, ServicePricingOverride,
};
use crate::domain::value_objects::{apply_markup, ArithmeticError, ProviderId, UserId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Markup applied when no rule matches.
pub const DEFAULT_MARKUP_PERCENTAGE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Error type for pricing operations.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Rule store failure.
    #[error("pricing rule lookup failed: {0}")]
    Repository(String),

    /// Markup computation overflowed.
    #[error("pricing arithmetic failed: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl PricingError {
    /// Creates a rule store error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Read side of the pricing rule store.
///
/// Each lookup returns at most one rule, and only active rules.
#[async_trait]
pub trait PricingRuleLookup: Send + Sync + fmt::Debug {
    /// Finds the active global rule of a user.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Repository` if the store cannot be read.
    async fn find_global(&self, user_id: UserId) -> PricingResult<Option<GlobalPricingRule>>;

    /// Finds the active rule of a user for a provider.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Repository` if the store cannot be read.
    async fn find_provider_rule(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
    ) -> PricingResult<Option<ProviderPricingRule>>;

    /// Finds the active override of a user for one service of a provider.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Repository` if the store cannot be read.
    async fn find_service_override(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
        service_code: &str,
    ) -> PricingResult<Option<ServicePricingOverride>>;
}

/// Rule scopes consulted for a known user, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingScope {
    /// User + provider + service code.
    ServiceOverride,
    /// User + provider.
    Provider,
    /// User.
    Global,
}

impl PricingScope {
    /// Evaluation order of the cascade.
    pub const CASCADE: [Self; 3] = [Self::ServiceOverride, Self::Provider, Self::Global];
}

impl fmt::Display for PricingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceOverride => write!(f, "service_override"),
            Self::Provider => write!(f, "provider"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Where the applied adjustment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingSource {
    /// The configured default markup.
    Default,
    /// A rule of the given scope.
    Rule(PricingScope),
}

/// Outcome of pricing one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Applied markup; zero for fixed prices.
    pub markup_percentage: Decimal,
    /// Price charged to the user.
    pub final_price: Decimal,
    /// Origin of the adjustment.
    pub source: PricingSource,
}

/// Identifies what is being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingContext<'a> {
    /// Requesting user.
    pub user_id: UserId,
    /// Quoting provider.
    pub provider_id: ProviderId,
    /// Carrier service code, if the carrier sent one.
    pub service_code: Option<&'a str>,
}

/// Resolves markups and fixed prices from the rule store.
#[derive(Debug, Clone)]
pub struct PricingResolver {
    rules: Arc<dyn PricingRuleLookup>,
    default_markup: Decimal,
}

impl PricingResolver {
    /// Creates a resolver with the standard default markup.
    #[must_use]
    pub fn new(rules: Arc<dyn PricingRuleLookup>) -> Self {
        Self {
            rules,
            default_markup: DEFAULT_MARKUP_PERCENTAGE,
        }
    }

    /// Sets the fallback markup percentage.
    #[must_use]
    pub fn with_default_markup(mut self, default_markup: Decimal) -> Self {
        self.default_markup = default_markup;
        self
    }

    /// Returns the fallback markup percentage.
    #[inline]
    #[must_use]
    pub fn default_markup(&self) -> Decimal {
        self.default_markup
    }

    /// Looks up the adjustment a single scope contributes.
    ///
    /// Returns `None` when the scope has no active rule, or its rule holds
    /// no usable value.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Repository` if the rule store fails.
    pub async fn lookup(
        &self,
        scope: PricingScope,
        ctx: &PricingContext<'_>,
    ) -> PricingResult<Option<PriceAdjustment>> {
        let adjustment = match scope {
            PricingScope::ServiceOverride => match ctx.service_code.filter(|code| !code.is_empty()) {
                Some(code) => self
                    .rules
                    .find_service_override(ctx.user_id, ctx.provider_id, code)
                    .await?
                    .and_then(|rule| rule.adjustment()),
                None => None,
            },
            PricingScope::Provider => self
                .rules
                .find_provider_rule(ctx.user_id, ctx.provider_id)
                .await?
                .and_then(|rule| rule.markup_percentage())
                .map(PriceAdjustment::Markup),
            PricingScope::Global => self
                .rules
                .find_global(ctx.user_id)
                .await?
                .and_then(|rule| rule.markup_percentage())
                .map(PriceAdjustment::Markup),
        };
        Ok(adjustment)
    }

    /// Prices one service for an optional user.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Repository` if the rule store fails, or
    /// `PricingError::Arithmetic` if the markup overflows.
    pub async fn price(
        &self,
        user_id: Option<UserId>,
        provider_id: ProviderId,
        service_code: Option<&str>,
        base_price: Decimal,
    ) -> PricingResult<Pricing> {
        let default = PriceAdjustment::Markup(self.default_markup);
        let Some(user_id) = user_id else {
            return self.apply(base_price, default, PricingSource::Default);
        };

        let ctx = PricingContext {
            user_id,
            provider_id,
            service_code,
        };

        for scope in PricingScope::CASCADE {
            if let Some(adjustment) = self.lookup(scope, &ctx).await? {
                return self.apply(base_price, adjustment, PricingSource::Rule(scope));
            }
        }

        self.apply(base_price, default, PricingSource::Default)
    }

    fn apply(
        &self,
        base_price: Decimal,
        adjustment: PriceAdjustment,
        source: PricingSource,
    ) -> PricingResult<Pricing> {
        let pricing = match adjustment {
            PriceAdjustment::FixedPrice(price) => Pricing {
                markup_percentage: Decimal::ZERO,
                final_price: price,
                source,
            },
            PriceAdjustment::Markup(markup) => Pricing {
                markup_percentage: markup,
                final_price: apply_markup(base_price, markup)?,
                source,
            },
        };
        Ok(pricing)
    }
}
