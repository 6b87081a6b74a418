//! # stacktrack-core
//!
//! Domain models and conversion math for StackTrack, a personal wishlist
//! of purchase goals priced in fiat and tracked in bitcoin satoshis.
//!
//! This crate is pure: models, invariants, and arithmetic. Persistence
//! lives in `stacktrack-store`; price resolution in `stacktrack-price`.

pub mod convert;
pub mod error;
pub mod model;

pub use convert::{SATS_PER_BITCOIN, fiat_to_sats, format_fiat, format_sats, sats_to_fiat};
pub use error::{CoreError, Result};
pub use model::{Category, Currency, PriceQuote, Priority, Theme, UserSettings, WishlistItem};
