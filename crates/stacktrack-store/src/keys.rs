//! Storage Keys
//!
//! The fixed keys StackTrack persists under. Kept byte-identical to the
//! original local-storage keys so exported data imports cleanly.

/// All wishlist items, as one JSON array
pub const WISHLIST_ITEMS: &str = "stacktrack_wishlist_items";

/// All categories, as one JSON array
pub const CATEGORIES: &str = "stacktrack_categories";

/// The user settings record
pub const USER_SETTINGS: &str = "stacktrack_user_settings";

/// The single-slot cached bitcoin price quote
pub const BITCOIN_PRICE: &str = "stacktrack_bitcoin_price";
