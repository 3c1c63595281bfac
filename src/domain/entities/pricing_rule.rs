//! # Pricing Rules
//!
//! User-scoped markup and fixed-price rules.
//!
//! Three scopes exist, from broadest to narrowest:
//!
//! | Rule | Scope | Adjustment |
//! |------|-------|------------|
//! | [`GlobalPricingRule`] | user | markup |
//! | [`ProviderPricingRule`] | user + provider | markup |
//! | [`ServicePricingOverride`] | user + provider + service code | fixed price or markup |
//!
//! Every rule carries an `active` flag; inactive rules are ignored by
//! lookups. At most one rule exists per scope.

use crate::domain::value_objects::{ProviderId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price adjustment selected by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceAdjustment {
    /// Final price used verbatim.
    FixedPrice(Decimal),
    /// Markup percentage applied to the base price.
    Markup(Decimal),
}

/// Default markup for one user across every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPricingRule {
    user_id: UserId,
    markup_percentage: Option<Decimal>,
    active: bool,
}

impl GlobalPricingRule {
    /// Creates an active global rule.
    #[must_use]
    pub fn new(user_id: UserId, markup_percentage: Option<Decimal>) -> Self {
        Self {
            user_id,
            markup_percentage,
            active: true,
        }
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the owning user.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the markup percentage, if set.
    #[inline]
    #[must_use]
    pub fn markup_percentage(&self) -> Option<Decimal> {
        self.markup_percentage
    }

    /// Returns true if lookups should consider this rule.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Markup for one user on one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPricingRule {
    user_id: UserId,
    provider_id: ProviderId,
    markup_percentage: Option<Decimal>,
    active: bool,
}

impl ProviderPricingRule {
    /// Creates an active provider rule.
    #[must_use]
    pub fn new(user_id: UserId, provider_id: ProviderId, markup_percentage: Option<Decimal>) -> Self {
        Self {
            user_id,
            provider_id,
            markup_percentage,
            active: true,
        }
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the owning user.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the provider this rule applies to.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    /// Returns the markup percentage, if set.
    #[inline]
    #[must_use]
    pub fn markup_percentage(&self) -> Option<Decimal> {
        self.markup_percentage
    }

    /// Returns true if lookups should consider this rule.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Fixed price or markup for one user on one service of one provider.
///
/// When both values are set the fixed price wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePricingOverride {
    user_id: UserId,
    provider_id: ProviderId,
    service_code: String,
    fixed_price: Option<Decimal>,
    markup_percentage: Option<Decimal>,
    active: bool,
}

impl ServicePricingOverride {
    /// Creates an active override with explicit fixed price and markup.
    #[must_use]
    pub fn new(
        user_id: UserId,
        provider_id: ProviderId,
        service_code: impl Into<String>,
        fixed_price: Option<Decimal>,
        markup_percentage: Option<Decimal>,
    ) -> Self {
        Self {
            user_id,
            provider_id,
            service_code: service_code.into(),
            fixed_price,
            markup_percentage,
            active: true,
        }
    }

    /// Creates an active fixed-price override.
    #[must_use]
    pub fn fixed_price(
        user_id: UserId,
        provider_id: ProviderId,
        service_code: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self::new(user_id, provider_id, service_code, Some(price), None)
    }

    /// Creates an active markup override.
    #[must_use]
    pub fn markup(
        user_id: UserId,
        provider_id: ProviderId,
        service_code: impl Into<String>,
        markup_percentage: Decimal,
    ) -> Self {
        Self::new(user_id, provider_id, service_code, None, Some(markup_percentage))
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the owning user.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the provider this override applies to.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    /// Returns the carrier service code.
    #[inline]
    #[must_use]
    pub fn service_code(&self) -> &str {
        &self.service_code
    }

    /// Returns the fixed price, if set.
    #[inline]
    #[must_use]
    pub fn fixed_price_value(&self) -> Option<Decimal> {
        self.fixed_price
    }

    /// Returns the markup percentage, if set.
    #[inline]
    #[must_use]
    pub fn markup_percentage(&self) -> Option<Decimal> {
        self.markup_percentage
    }

    /// Returns true if lookups should consider this override.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the adjustment this override selects.
    ///
    /// `None` when neither value is set, in which case pricing falls
    /// through to the broader scopes.
    #[must_use]
    pub fn adjustment(&self) -> Option<PriceAdjustment> {
        self.fixed_price
            .map(PriceAdjustment::FixedPrice)
            .or(self.markup_percentage.map(PriceAdjustment::Markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new(1)
    }

    fn provider() -> ProviderId {
        ProviderId::new(2)
    }

    #[test]
    fn fixed_price_wins_over_markup() {
        let rule = ServicePricingOverride::new(
            user(),
            provider(),
            "ground",
            Some(Decimal::new(150, 0)),
            Some(Decimal::new(50, 0)),
        );
        assert_eq!(
            rule.adjustment(),
            Some(PriceAdjustment::FixedPrice(Decimal::new(150, 0)))
        );
    }

    #[test]
    fn markup_override_adjustment() {
        let rule = ServicePricingOverride::markup(user(), provider(), "express", Decimal::new(5, 0));
        assert_eq!(rule.adjustment(), Some(PriceAdjustment::Markup(Decimal::new(5, 0))));
        assert_eq!(rule.service_code(), "express");
    }

    #[test]
    fn empty_override_has_no_adjustment() {
        let rule = ServicePricingOverride::new(user(), provider(), "ground", None, None);
        assert_eq!(rule.adjustment(), None);
    }

    #[test]
    fn rules_default_to_active() {
        assert!(GlobalPricingRule::new(user(), None).is_active());
        assert!(ProviderPricingRule::new(user(), provider(), None).is_active());
        assert!(!GlobalPricingRule::new(user(), None).with_active(false).is_active());
    }
}
