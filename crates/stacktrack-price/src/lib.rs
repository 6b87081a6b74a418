//! # stacktrack-price
//!
//! Bitcoin price resolution for StackTrack: an ordered list of public
//! providers, a single-slot durable cache, and a resolver whose contract
//! is total - it always hands back a usable [`PriceQuote`], falling from
//! fresh cache through live providers to stale cache to a fixed estimate.
//!
//! ```no_run
//! use std::sync::Arc;
//! use stacktrack_core::convert::fiat_to_sats;
//! use stacktrack_price::{KvQuoteCache, PriceResolver};
//! use stacktrack_store::JsonFileStore;
//!
//! # async fn demo() -> stacktrack_store::Result<()> {
//! let kv = Arc::new(JsonFileStore::open("stacktrack.json")?);
//! let resolver = PriceResolver::new(Arc::new(KvQuoteCache::new(kv)));
//!
//! let quote = resolver.resolve_current_quote().await;
//! let sats = fiat_to_sats(rust_decimal::Decimal::from(100), &quote);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod resolver;
pub mod source;
pub mod transport;

pub use cache::{KvQuoteCache, QuoteCache};
pub use error::FeedError;
pub use resolver::{PriceResolver, Resolution, ResolverConfig};
pub use source::{ExtractFn, PriceSource, default_sources};
pub use transport::{HttpTransport, PriceTransport};
