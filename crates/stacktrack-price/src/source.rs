//! Price Sources
//!
//! External providers of the fiat/BTC exchange rate. Every provider is the
//! same record shape - a name, an endpoint, and a pure extraction function
//! for that provider's response schema - so the resolver runs one generic
//! loop instead of one code path per provider. List order is priority
//! order: the first source that yields a plausible rate wins.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

/// Pulls a fiat rate out of one provider's response body, or nothing
pub type ExtractFn = fn(&Value) -> Option<Decimal>;

/// One external exchange-rate provider
#[derive(Clone)]
pub struct PriceSource {
    /// Name for diagnostics
    pub name: String,

    /// HTTP GET endpoint returning JSON
    pub endpoint: String,

    /// Schema-specific rate extraction
    pub extract: ExtractFn,
}

impl PriceSource {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, extract: ExtractFn) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            extract,
        }
    }
}

impl std::fmt::Debug for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceSource")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// The default USD provider list, in priority order
pub fn default_sources() -> Vec<PriceSource> {
    vec![
        PriceSource::new(
            "block",
            "https://pricing.bitcoin.block.xyz/current-price",
            extract_block,
        ),
        PriceSource::new(
            "coingecko",
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd",
            extract_coingecko,
        ),
        PriceSource::new(
            "coinbase",
            "https://api.coinbase.com/v2/prices/BTC-USD/spot",
            extract_coinbase,
        ),
    ]
}

/// Block price API: `{ "USD": 67890.12, ... }`
fn extract_block(body: &Value) -> Option<Decimal> {
    decimal_value(body.get("USD")?)
}

/// CoinGecko simple price: `{ "bitcoin": { "usd": 67890.12 } }`
fn extract_coingecko(body: &Value) -> Option<Decimal> {
    decimal_value(body.get("bitcoin")?.get("usd")?)
}

/// Coinbase spot price: `{ "data": { "amount": "67890.12", ... } }`
fn extract_coinbase(body: &Value) -> Option<Decimal> {
    decimal_value(body.get("data")?.get("amount")?)
}

/// Accepts a JSON number or a decimal string; anything else is absence
fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).and_then(Decimal::from_f64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
