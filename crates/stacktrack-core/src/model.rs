//! Domain Models
//!
//! Core data types for wishlist tracking and bitcoin pricing.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// One fiat-to-bitcoin exchange rate observation
///
/// The persisted form is the camelCase JSON record the app has always
/// stored under its price key: `{ "rate": ..., "observedAt": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Fiat price of one bitcoin (e.g. USD per BTC)
    #[serde(rename = "rate")]
    pub rate_fiat_per_btc: Decimal,

    /// When this rate was obtained from a provider
    pub observed_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Quote observed now. Rejects non-positive rates.
    pub fn new(rate_fiat_per_btc: Decimal) -> Result<Self> {
        Self::observed(rate_fiat_per_btc, Utc::now())
    }

    /// Quote with an explicit observation time. Rejects non-positive rates.
    pub fn observed(rate_fiat_per_btc: Decimal, observed_at: DateTime<Utc>) -> Result<Self> {
        if rate_fiat_per_btc <= Decimal::ZERO {
            return Err(CoreError::InvalidRate(rate_fiat_per_btc));
        }
        Ok(Self {
            rate_fiat_per_btc,
            observed_at,
        })
    }

    /// How old this observation is at `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.observed_at
    }

    /// Whether the observation is younger than `window` at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) < window
    }
}

/// Supported fiat currencies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
    Jpy,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Jpy => "JPY",
        }
    }

    /// Display symbol, as rendered in front of an amount
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "\u{20ac}",
            Currency::Gbp => "\u{a3}",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
            Currency::Jpy => "\u{a5}",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            "JPY" => Ok(Currency::Jpy),
            other => Err(CoreError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// Purchase priority for a wishlist item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A purchase goal on the user's wishlist
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Unique identifier
    pub id: Uuid,

    /// Item name
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Fiat price
    pub price: Decimal,

    /// Currency the price is denominated in
    pub currency: Currency,

    /// Estimated satoshi equivalent, computed from a PriceQuote
    pub sats_equivalent: Option<u64>,

    /// Purchase priority
    pub priority: Priority,

    /// Category name, if the item is filed under one
    pub category: Option<String>,

    /// Product page link
    pub url: Option<String>,

    /// Product image link
    pub image_url: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,

    /// Optional target purchase date
    pub target_date: Option<DateTime<Utc>>,

    /// Free-form notes
    pub notes: Option<String>,
}

impl WishlistItem {
    pub fn new(name: impl Into<String>, price: Decimal, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            price,
            currency,
            sats_equivalent: None,
            priority: Priority::default(),
            category: None,
            url: None,
            image_url: None,
            created_at: now,
            updated_at: now,
            target_date: None,
            notes: None,
        }
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A category for organizing wishlist items
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,

    /// Category name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Display color (hex string)
    pub color: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            color: None,
            created_at: Utc::now(),
        }
    }
}

/// UI theme preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

/// Per-user application settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSettings {
    /// Currency new items default to
    pub default_currency: Currency,

    /// UI theme
    pub theme: Theme,

    /// Whether notifications are enabled
    pub notifications: bool,

    /// When true, sensitive information is hidden by default
    pub privacy_mode: bool,

    /// Auto-convert fiat prices to sats on display
    pub auto_convert_sats: bool,

    /// Last successful sync, if the user has ever synced
    pub last_sync: Option<DateTime<Utc>>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_currency: Currency::Usd,
            theme: Theme::Dark,
            notifications: true,
            privacy_mode: false,
            auto_convert_sats: true,
            last_sync: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_rejects_non_positive_rate() {
        assert!(PriceQuote::new(dec!(0)).is_err());
        assert!(PriceQuote::new(dec!(-61000)).is_err());
        assert!(PriceQuote::new(dec!(61000)).is_ok());
    }

    #[test]
    fn test_quote_freshness() {
        let now = Utc::now();
        let quote = PriceQuote::observed(dec!(50000), now - Duration::minutes(10)).unwrap();

        assert!(quote.is_fresh(now, Duration::minutes(15)));
        assert!(!quote.is_fresh(now, Duration::minutes(5)));
    }

    #[test]
    fn test_quote_persisted_shape() {
        let quote = PriceQuote::observed(
            dec!(67890.12),
            "2024-06-01T12:00:00Z".parse().unwrap(),
        )
        .unwrap();

        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("rate").is_some());
        assert!(json.get("observedAt").is_some());

        let back: PriceQuote = serde_json::from_value(json).unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("BTC".parse::<Currency>().is_err());
    }

    #[test]
    fn test_item_defaults() {
        let item = WishlistItem::new("Hardware wallet", dec!(119.99), Currency::Usd);
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.created_at, item.updated_at);
        assert!(item.sats_equivalent.is_none());
    }
}
