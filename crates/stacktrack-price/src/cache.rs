//! Quote Cache
//!
//! Single-slot persistence of the most recently resolved [`PriceQuote`].
//! Both operations are total: a read never fails (missing, corrupt, and
//! invalid data all come back as absence) and a write of an invalid quote
//! is rejected as a no-op rather than corrupting the slot.

use std::sync::Arc;

use rust_decimal::Decimal;

use stacktrack_core::model::PriceQuote;
use stacktrack_store::keys;
use stacktrack_store::kv::KvStore;

/// Single-slot quote persistence seam
pub trait QuoteCache: Send + Sync {
    /// The stored quote, if one exists and is usable
    fn read(&self) -> Option<PriceQuote>;

    /// Overwrite the slot. A non-positive rate is rejected and logged;
    /// the previous entry stays in place.
    fn write(&self, quote: &PriceQuote);
}

/// [`QuoteCache`] over the shared key-value store
pub struct KvQuoteCache {
    kv: Arc<dyn KvStore>,
    key: String,
}

impl KvQuoteCache {
    /// Cache under the app's fixed price key
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_key(kv, keys::BITCOIN_PRICE)
    }

    pub fn with_key(kv: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }
}

impl QuoteCache for KvQuoteCache {
    fn read(&self) -> Option<PriceQuote> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "quote cache unreadable");
                return None;
            }
        };

        let quote: PriceQuote = match serde_json::from_str(&raw) {
            Ok(quote) => quote,
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt cached quote");
                return None;
            }
        };

        if quote.rate_fiat_per_btc <= Decimal::ZERO {
            tracing::warn!(rate = %quote.rate_fiat_per_btc, "discarding cached quote with non-positive rate");
            return None;
        }

        Some(quote)
    }

    fn write(&self, quote: &PriceQuote) {
        if quote.rate_fiat_per_btc <= Decimal::ZERO {
            tracing::error!(rate = %quote.rate_fiat_per_btc, "refusing to cache non-positive rate");
            return;
        }

        let raw = match serde_json::to_string(quote) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(error = %err, "quote failed to serialize");
                return;
            }
        };

        if let Err(err) = self.kv.set(&self.key, &raw) {
            tracing::warn!(error = %err, "quote cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use stacktrack_store::kv::MemoryStore;

    fn cache_over(kv: Arc<MemoryStore>) -> KvQuoteCache {
        KvQuoteCache::new(kv)
    }

    #[test]
    fn test_empty_cache_reads_absent() {
        assert!(cache_over(Arc::new(MemoryStore::new())).read().is_none());
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        let quote = PriceQuote::new(dec!(67890.12)).unwrap();

        cache.write(&quote);
        assert_eq!(cache.read(), Some(quote));
    }

    #[test]
    fn test_corrupt_entry_reads_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::BITCOIN_PRICE, "{ definitely not json").unwrap();

        assert!(cache_over(kv).read().is_none());
    }

    #[test]
    fn test_invalid_write_leaves_entry_unchanged() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        let good = PriceQuote::new(dec!(61000)).unwrap();
        cache.write(&good);

        // Bypasses the validating constructor on purpose
        let bad = PriceQuote {
            rate_fiat_per_btc: dec!(-5),
            observed_at: Utc::now(),
        };
        cache.write(&bad);

        assert_eq!(cache.read(), Some(good));
    }

    #[test]
    fn test_non_positive_persisted_rate_reads_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            keys::BITCOIN_PRICE,
            r#"{"rate":"-5","observedAt":"2024-06-01T12:00:00Z"}"#,
        )
        .unwrap();

        assert!(cache_over(kv).read().is_none());
    }
}
