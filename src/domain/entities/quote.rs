//! # Quote Entities
//!
//! Carrier offers before and after pricing.
//!
//! A [`ServiceQuote`] is what a carrier adapter extracts from one service
//! record of a carrier response. A [`PricedQuote`] is the aggregate output
//! row: either a priced service or a per-provider error placeholder, never
//! both.
//!
//! # Wire Shape
//!
//! Both outcomes serialize to the same set of keys so clients can treat the
//! quote list as a flat table:
//!
//! ```json
//! {"provider": "DHL", "provider_id": 3, "service": "Express", "service_code": "EXP",
//!  "base_price": 200.0, "markup_percentage": 18.0, "final_price": 236.0, "currency": "MXN"}
//! ```
//!
//! Error placeholders null the quote fields and add `error` and
//! `error_message`.

use crate::domain::value_objects::ProviderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency assumed when a carrier omits one.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// One service offer extracted from a carrier response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQuote {
    service_name: String,
    service_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    base_price: Decimal,
    currency: String,
}

impl ServiceQuote {
    /// Creates a service quote.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        service_code: Option<String>,
        base_price: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_code,
            base_price,
            currency: currency.into(),
        }
    }

    /// Returns the human-readable service name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the carrier's service code, if any.
    #[inline]
    #[must_use]
    pub fn service_code(&self) -> Option<&str> {
        self.service_code.as_deref()
    }

    /// Returns the unmodified carrier price.
    #[inline]
    #[must_use]
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// Machine-readable reason a provider produced no priced quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteErrorCode {
    /// The carrier answered with an empty services collection.
    ProviderNoServices,
    /// Timeout, refused connection or DNS failure.
    ProviderUnavailable,
    /// Any other failure while building, parsing or pricing.
    ProviderError,
}

impl QuoteErrorCode {
    /// Returns the wire code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProviderNoServices => "PROVIDER_NO_SERVICES",
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::ProviderError => "PROVIDER_ERROR",
        }
    }

    /// Returns the human message shown to clients.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ProviderNoServices => "Provider returned no services",
            Self::ProviderUnavailable => "Network error or timeout",
            Self::ProviderError => "Failed to process provider response",
        }
    }
}

impl fmt::Display for QuoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of quoting one service, or of one failed provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    /// A service priced for the requesting user.
    Priced {
        /// The carrier offer.
        service: ServiceQuote,
        /// Applied markup; zero for fixed prices.
        markup_percentage: Decimal,
        /// Price charged to the user.
        final_price: Decimal,
    },
    /// The provider failed as a whole.
    Failed {
        /// Failure kind.
        code: QuoteErrorCode,
    },
}

/// One row of the aggregated quote list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "PricedQuoteRecord")]
pub struct PricedQuote {
    provider: String,
    provider_id: ProviderId,
    outcome: QuoteOutcome,
}

impl PricedQuote {
    /// Creates a priced row.
    #[must_use]
    pub fn priced(
        provider: impl Into<String>,
        provider_id: ProviderId,
        service: ServiceQuote,
        markup_percentage: Decimal,
        final_price: Decimal,
    ) -> Self {
        Self {
            provider: provider.into(),
            provider_id,
            outcome: QuoteOutcome::Priced {
                service,
                markup_percentage,
                final_price,
            },
        }
    }

    /// Creates an error placeholder row.
    #[must_use]
    pub fn failed(provider: impl Into<String>, provider_id: ProviderId, code: QuoteErrorCode) -> Self {
        Self {
            provider: provider.into(),
            provider_id,
            outcome: QuoteOutcome::Failed { code },
        }
    }

    /// Returns the provider name.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns the provider ID.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    /// Returns the outcome.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> &QuoteOutcome {
        &self.outcome
    }

    /// Returns the error code for placeholder rows.
    #[must_use]
    pub fn error_code(&self) -> Option<QuoteErrorCode> {
        match self.outcome {
            QuoteOutcome::Failed { code } => Some(code),
            QuoteOutcome::Priced { .. } => None,
        }
    }

    /// Returns the final price for priced rows.
    #[must_use]
    pub fn final_price(&self) -> Option<Decimal> {
        match self.outcome {
            QuoteOutcome::Priced { final_price, .. } => Some(final_price),
            QuoteOutcome::Failed { .. } => None,
        }
    }

    /// Returns the markup percentage for priced rows.
    #[must_use]
    pub fn markup_percentage(&self) -> Option<Decimal> {
        match self.outcome {
            QuoteOutcome::Priced {
                markup_percentage, ..
            } => Some(markup_percentage),
            QuoteOutcome::Failed { .. } => None,
        }
    }

    /// Returns the service for priced rows.
    #[must_use]
    pub fn service(&self) -> Option<&ServiceQuote> {
        match &self.outcome {
            QuoteOutcome::Priced { service, .. } => Some(service),
            QuoteOutcome::Failed { .. } => None,
        }
    }
}

/// Flat serialization form of [`PricedQuote`].
#[derive(Debug, Serialize)]
struct PricedQuoteRecord {
    provider: String,
    provider_id: ProviderId,
    service: Option<String>,
    service_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    base_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    markup_percentage: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    final_price: Option<Decimal>,
    currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<QuoteErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<&'static str>,
}

impl From<PricedQuote> for PricedQuoteRecord {
    fn from(quote: PricedQuote) -> Self {
        let PricedQuote {
            provider,
            provider_id,
            outcome,
        } = quote;

        match outcome {
            QuoteOutcome::Priced {
                service,
                markup_percentage,
                final_price,
            } => Self {
                provider,
                provider_id,
                service: Some(service.service_name),
                service_code: service.service_code,
                base_price: Some(service.base_price),
                markup_percentage: Some(markup_percentage),
                final_price: Some(final_price),
                currency: Some(service.currency),
                error: None,
                error_message: None,
            },
            QuoteOutcome::Failed { code } => Self {
                provider,
                provider_id,
                service: None,
                service_code: None,
                base_price: None,
                markup_percentage: None,
                final_price: None,
                currency: None,
                error: Some(code),
                error_message: Some(code.message()),
            },
        }
    }
}
