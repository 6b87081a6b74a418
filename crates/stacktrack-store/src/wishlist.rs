//! Wishlist Storage
//!
//! Key-based CRUD over the shared [`KvStore`]: each collection lives as one
//! JSON document under a fixed key. Corrupt collections read as empty so a
//! bad record never takes the whole app down.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use stacktrack_core::model::{Category, UserSettings, WishlistItem};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::kv::KvStore;

/// Wishlist, category, and settings persistence
pub struct WishlistStore {
    kv: Arc<dyn KvStore>,
}

impl WishlistStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// All wishlist items
    pub fn items(&self) -> Result<Vec<WishlistItem>> {
        self.read_collection(keys::WISHLIST_ITEMS)
    }

    /// Append a new item and persist the collection
    pub fn save_item(&self, item: WishlistItem) -> Result<WishlistItem> {
        let mut items = self.items()?;
        items.push(item.clone());
        self.write_collection(keys::WISHLIST_ITEMS, &items)?;
        Ok(item)
    }

    /// Replace a stored item by id, bumping its modification timestamp
    pub fn update_item(&self, mut item: WishlistItem) -> Result<WishlistItem> {
        let mut items = self.items()?;
        let slot = items
            .iter_mut()
            .find(|stored| stored.id == item.id)
            .ok_or(StoreError::ItemNotFound(item.id))?;

        item.touch();
        *slot = item.clone();
        self.write_collection(keys::WISHLIST_ITEMS, &items)?;
        Ok(item)
    }

    /// Delete an item by id; `false` when no such item is stored
    pub fn delete_item(&self, id: Uuid) -> Result<bool> {
        let items = self.items()?;
        let before = items.len();
        let remaining: Vec<WishlistItem> =
            items.into_iter().filter(|item| item.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.write_collection(keys::WISHLIST_ITEMS, &remaining)?;
        Ok(true)
    }

    /// All categories
    pub fn categories(&self) -> Result<Vec<Category>> {
        self.read_collection(keys::CATEGORIES)
    }

    /// Append a new category and persist the collection
    pub fn save_category(&self, category: Category) -> Result<Category> {
        let mut categories = self.categories()?;
        categories.push(category.clone());
        self.write_collection(keys::CATEGORIES, &categories)?;
        Ok(category)
    }

    /// User settings; defaults when never written or unreadable
    pub fn settings(&self) -> Result<UserSettings> {
        let Some(raw) = self.kv.get(keys::USER_SETTINGS)? else {
            return Ok(UserSettings::default());
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::warn!(error = %err, "settings record corrupt, using defaults");
                Ok(UserSettings::default())
            }
        }
    }

    /// Overwrite the settings record
    pub fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.kv.set(keys::USER_SETTINGS, &raw)
    }

    /// Remove every StackTrack record, cached price included
    pub fn clear_all(&self) -> Result<()> {
        self.kv.remove(keys::WISHLIST_ITEMS)?;
        self.kv.remove(keys::CATEGORIES)?;
        self.kv.remove(keys::USER_SETTINGS)?;
        self.kv.remove(keys::BITCOIN_PRICE)?;
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(key, error = %err, "collection corrupt, reading as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.kv.set(key, &raw)
    }
}
