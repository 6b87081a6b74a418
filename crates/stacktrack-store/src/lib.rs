//! # stacktrack-store
//!
//! Durable persistence for StackTrack: a key-value store seam standing in
//! for browser local storage, with a file-backed implementation, plus the
//! wishlist/category/settings CRUD layered on top of it.

pub mod error;
pub mod keys;
pub mod kv;
pub mod wishlist;

pub use error::{Result, StoreError};
pub use kv::{JsonFileStore, KvStore, MemoryStore};
pub use wishlist::WishlistStore;
