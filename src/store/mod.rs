//! Persistent key-value store contract.
//!
//! Settings and bookmarks are kept as JSON-encoded values under the keys in
//! [`keys`]. The store is shared process-wide; writes are last-write-wins.

pub mod memory;
pub mod sqlite;

use crate::types::errors::StoreError;

/// Keys used by the core.
pub mod keys {
    pub const SEARCH_ENGINE: &str = "search.engine";
    pub const SEARCH_CUSTOM_TEMPLATE: &str = "search.custom_template";
    pub const PRIVATE_MODE: &str = "privacy.private_mode";
    pub const HOMEPAGE: &str = "general.homepage";
    pub const NEW_TAB_PAGE: &str = "general.new_tab_page";
    pub const NEW_WINDOW_POLICY: &str = "general.new_window_policy";
    pub const THEME: &str = "appearance.theme";
    pub const FONT_SIZE: &str = "appearance.font_size";
    pub const COMPACT_MODE: &str = "appearance.compact_mode";
    pub const BOOKMARKS: &str = "bookmarks";
}

/// A string key-value store. Each call is atomic on its own.
pub trait PersistentStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
