//! Price Resolver
//!
//! Produces the current fiat/BTC quote through a fixed fallback ladder:
//! fresh cache, then each provider in priority order, then the stale cache,
//! then a hardcoded estimate. The operation is total - routine provider or
//! network failure never reaches the caller as an error, only as an older
//! `observed_at` on the returned quote.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;

use stacktrack_core::model::PriceQuote;

use crate::cache::QuoteCache;
use crate::error::FeedError;
use crate::source::{PriceSource, default_sources};
use crate::transport::{HttpTransport, PriceTransport};

/// Resolution policy knobs
///
/// Defaults are the app's long-standing constants; changing them changes
/// observable refresh behavior, so do it deliberately.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Maximum cache age before a refresh is attempted
    pub freshness_window: chrono::Duration,

    /// Per-request timeout against provider endpoints
    pub request_timeout: Duration,

    /// Rate used when every provider fails and no cache exists
    pub fallback_rate: Decimal,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            freshness_window: chrono::Duration::minutes(15),
            request_timeout: Duration::from_secs(5),
            fallback_rate: Decimal::from(61_000),
        }
    }
}

/// How a resolution was satisfied
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Cache entry within the freshness window; no network touched
    FreshCache,

    /// The named provider answered; cache updated
    Refreshed { source: String },

    /// Every provider failed; stale cache entry returned unmodified
    StaleCache,

    /// Every provider failed and no cache exists; fixed estimate
    Fallback,
}

/// Multi-source price resolution with caching
pub struct PriceResolver {
    sources: Vec<PriceSource>,
    cache: Arc<dyn QuoteCache>,
    transport: Arc<dyn PriceTransport>,
    config: ResolverConfig,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl PriceResolver {
    /// Resolver over the default provider list and HTTP transport
    pub fn new(cache: Arc<dyn QuoteCache>) -> Self {
        let config = ResolverConfig::default();
        let transport = Arc::new(HttpTransport::new(config.request_timeout));
        Self::with_parts(default_sources(), cache, transport, config)
    }

    /// Fully injected construction, for tests and custom provider sets
    pub fn with_parts(
        sources: Vec<PriceSource>,
        cache: Arc<dyn QuoteCache>,
        transport: Arc<dyn PriceTransport>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            sources,
            cache,
            transport,
            config,
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// The current quote. Total: always returns a usable quote, possibly
    /// stale (check `observed_at`) or the fixed fallback estimate.
    pub async fn resolve_current_quote(&self) -> PriceQuote {
        let (quote, resolution) = self.resolve_detailed().await;
        match &resolution {
            Resolution::FreshCache => {
                tracing::debug!(rate = %quote.rate_fiat_per_btc, "using fresh cached quote");
            }
            Resolution::Refreshed { source } => {
                tracing::info!(source = %source, rate = %quote.rate_fiat_per_btc, "quote refreshed");
            }
            Resolution::StaleCache => {
                tracing::warn!(observed_at = %quote.observed_at, "all sources failed, serving stale cached quote");
            }
            Resolution::Fallback => {
                tracing::warn!(rate = %quote.rate_fiat_per_btc, "all sources failed with no cache, serving fixed estimate");
            }
        }
        quote
    }

    /// The current quote plus how it was obtained
    pub async fn resolve_detailed(&self) -> (PriceQuote, Resolution) {
        let cached = self.cache.read();
        if let Some(quote) = &cached {
            if quote.is_fresh(Utc::now(), self.config.freshness_window) {
                return (quote.clone(), Resolution::FreshCache);
            }
        }

        // One refresh pass at a time: whoever waited here re-reads whatever
        // the gate holder fetched instead of repeating the source list.
        let _gate = self.refresh_gate.lock().await;
        let cached = self.cache.read().or(cached);
        if let Some(quote) = &cached {
            if quote.is_fresh(Utc::now(), self.config.freshness_window) {
                return (quote.clone(), Resolution::FreshCache);
            }
        }

        for source in &self.sources {
            match self.try_source(source).await {
                Ok(rate) => {
                    let quote = PriceQuote {
                        rate_fiat_per_btc: rate,
                        observed_at: Utc::now(),
                    };
                    self.cache.write(&quote);
                    return (
                        quote,
                        Resolution::Refreshed {
                            source: source.name.clone(),
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(source = %source.name, error = %err, "price source failed");
                }
            }
        }

        if let Some(quote) = cached {
            return (quote, Resolution::StaleCache);
        }

        let fallback = PriceQuote {
            rate_fiat_per_btc: self.config.fallback_rate,
            observed_at: Utc::now(),
        };
        (fallback, Resolution::Fallback)
    }

    /// One attempt against one source; no per-source retries
    async fn try_source(&self, source: &PriceSource) -> Result<Decimal, FeedError> {
        let body = self.transport.get_json(&source.endpoint).await?;
        match (source.extract)(&body) {
            Some(rate) if rate > Decimal::ZERO => Ok(rate),
            Some(rate) => Err(FeedError::ImplausibleRate(rate)),
            None => Err(FeedError::MalformedBody),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use crate::cache::KvQuoteCache;
    use stacktrack_store::kv::MemoryStore;

    /// Transport serving canned bodies per URL; unknown URLs fail
    struct ScriptedTransport {
        responses: HashMap<String, Value>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(responses: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(url, body)| (url.to_string(), body))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn dead() -> Self {
            Self::new([])
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceTransport for ScriptedTransport {
        async fn get_json(&self, url: &str) -> Result<Value, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(url)
                .cloned()
                .ok_or(FeedError::BadStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    fn extract_rate(body: &Value) -> Option<Decimal> {
        body.get("rate")?.as_str()?.trim().parse().ok()
    }

    fn test_sources() -> Vec<PriceSource> {
        vec![
            PriceSource::new("one", "mem://one", extract_rate),
            PriceSource::new("two", "mem://two", extract_rate),
            PriceSource::new("three", "mem://three", extract_rate),
        ]
    }

    fn resolver_with(
        transport: Arc<ScriptedTransport>,
        kv: Arc<MemoryStore>,
    ) -> PriceResolver {
        PriceResolver::with_parts(
            test_sources(),
            Arc::new(KvQuoteCache::new(kv)),
            transport,
            ResolverConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let kv = Arc::new(MemoryStore::new());
        let cache = KvQuoteCache::new(kv.clone());
        cache.write(&PriceQuote::new(dec!(64000)).unwrap());

        let transport = Arc::new(ScriptedTransport::dead());
        let resolver = resolver_with(transport.clone(), kv);

        let (quote, resolution) = resolver.resolve_detailed().await;
        assert_eq!(resolution, Resolution::FreshCache);
        assert_eq!(quote.rate_fiat_per_btc, dec!(64000));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_plausible_source_wins_and_caches() {
        // Source one: malformed body. Source two: negative rate.
        // Source three: the first plausible answer.
        let transport = Arc::new(ScriptedTransport::new([
            ("mem://one", json!({ "price": "67000" })),
            ("mem://two", json!({ "rate": "-5" })),
            ("mem://three", json!({ "rate": "67890.12" })),
        ]));
        let kv = Arc::new(MemoryStore::new());
        let resolver = resolver_with(transport.clone(), kv.clone());

        let (quote, resolution) = resolver.resolve_detailed().await;
        assert_eq!(
            resolution,
            Resolution::Refreshed {
                source: "three".into()
            }
        );
        assert_eq!(quote.rate_fiat_per_btc, dec!(67890.12));
        assert_eq!(transport.call_count(), 3);

        let cached = KvQuoteCache::new(kv).read().unwrap();
        assert_eq!(cached.rate_fiat_per_btc, dec!(67890.12));
    }

    #[tokio::test]
    async fn test_all_sources_failed_serves_stale_cache_unmodified() {
        let kv = Arc::new(MemoryStore::new());
        let cache = KvQuoteCache::new(kv.clone());
        let stale = PriceQuote::observed(
            dec!(58000),
            Utc::now() - chrono::Duration::hours(3),
        )
        .unwrap();
        cache.write(&stale);

        let resolver = resolver_with(Arc::new(ScriptedTransport::dead()), kv);

        let (quote, resolution) = resolver.resolve_detailed().await;
        assert_eq!(resolution, Resolution::StaleCache);
        assert_eq!(quote, stale);
    }

    #[tokio::test]
    async fn test_no_sources_no_cache_serves_fixed_fallback() {
        let kv = Arc::new(MemoryStore::new());
        let resolver = resolver_with(Arc::new(ScriptedTransport::dead()), kv.clone());

        let (quote, resolution) = resolver.resolve_detailed().await;
        assert_eq!(resolution, Resolution::Fallback);
        assert_eq!(quote.rate_fiat_per_btc, dec!(61000));

        // Fallback is served, never cached
        assert!(KvQuoteCache::new(kv).read().is_none());
    }

    #[tokio::test]
    async fn test_total_contract_via_public_operation() {
        let kv = Arc::new(MemoryStore::new());
        let resolver = resolver_with(Arc::new(ScriptedTransport::dead()), kv);

        let quote = resolver.resolve_current_quote().await;
        assert!(quote.rate_fiat_per_btc > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_concurrent_cold_callers_share_one_refresh() {
        /// Answers after a pause, so the second caller queues on the gate
        struct SlowTransport {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl PriceTransport for SlowTransport {
            async fn get_json(&self, _url: &str) -> Result<Value, FeedError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(json!({ "rate": "64000" }))
            }
        }

        let transport = Arc::new(SlowTransport {
            calls: AtomicUsize::new(0),
        });
        let kv = Arc::new(MemoryStore::new());
        let resolver = PriceResolver::with_parts(
            test_sources(),
            Arc::new(KvQuoteCache::new(kv)),
            transport.clone(),
            ResolverConfig::default(),
        );

        let (a, b) = tokio::join!(resolver.resolve_detailed(), resolver.resolve_detailed());
        assert_eq!(a.0.rate_fiat_per_btc, dec!(64000));
        assert_eq!(b.0.rate_fiat_per_btc, dec!(64000));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
