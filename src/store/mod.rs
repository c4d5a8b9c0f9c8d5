pub mod language;
pub mod storage;
pub mod wishlist;

pub use language::LanguagePreference;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use wishlist::{SubscriptionId, WishlistStore, WISHLIST_KEY};
