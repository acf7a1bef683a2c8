//! Bookmark Manager for GitBrowser.
//!
//! Implements `BookmarkManagerTrait`: a URL set stored as a JSON array under
//! [`keys::BOOKMARKS`] in the persistent store. Reads and writes are suppressed while
//! private mode is on, except for clearing, which always goes through.

use tracing::{debug, warn};

use crate::store::{keys, PersistentStore};
use crate::types::bookmark::BookmarkSet;
use crate::types::errors::BookmarkError;
use crate::types::settings::PrivacySettings;

/// Trait defining bookmark management operations.
pub trait BookmarkManagerTrait {
    /// Adds `url` unless already present. Returns whether the stored set changed.
    fn add_bookmark(&mut self, url: &str, privacy: &PrivacySettings) -> Result<bool, BookmarkError>;
    /// Returns whether the stored set changed.
    fn remove_bookmark(&mut self, url: &str, privacy: &PrivacySettings) -> Result<bool, BookmarkError>;
    fn is_bookmarked(&self, url: &str, privacy: &PrivacySettings) -> bool;
    /// `None` in private mode: bookmark UI is hidden, not shown empty.
    fn list_bookmarks(&self, privacy: &PrivacySettings) -> Option<Vec<String>>;
    /// Removes every bookmark regardless of private mode.
    fn clear_bookmarks(&mut self) -> Result<(), BookmarkError>;
}

/// Bookmark manager over a borrowed persistent store.
pub struct BookmarkManager<'a> {
    store: &'a dyn PersistentStore,
}

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided store.
    pub fn new(store: &'a dyn PersistentStore) -> Self {
        Self { store }
    }

    /// Reads the stored set. A malformed value reads as empty; duplicates are folded.
    fn read_set(&self) -> Result<BookmarkSet, BookmarkError> {
        let Some(raw) = self.store.get(keys::BOOKMARKS)? else {
            return Ok(BookmarkSet::default());
        };

        let urls: Vec<String> = match serde_json::from_str(&raw) {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, "stored bookmark list is malformed, treating as empty");
                Vec::new()
            }
        };

        let mut set = BookmarkSet::default();
        for url in &urls {
            set.insert(url);
        }
        Ok(set)
    }

    fn write_set(&self, set: &BookmarkSet) -> Result<(), BookmarkError> {
        let json = serde_json::to_string(set)
            .map_err(|e| BookmarkError::SerializationError(e.to_string()))?;
        self.store.set(keys::BOOKMARKS, &json)?;
        Ok(())
    }
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn add_bookmark(&mut self, url: &str, privacy: &PrivacySettings) -> Result<bool, BookmarkError> {
        let url = url.trim();
        if privacy.private_mode {
            debug!("private mode: bookmark not saved");
            return Ok(false);
        }
        if url.is_empty() {
            return Ok(false);
        }

        let mut set = self.read_set()?;
        if !set.insert(url) {
            return Ok(false);
        }
        self.write_set(&set)?;
        Ok(true)
    }

    fn remove_bookmark(&mut self, url: &str, privacy: &PrivacySettings) -> Result<bool, BookmarkError> {
        if privacy.private_mode {
            return Ok(false);
        }

        let mut set = self.read_set()?;
        if !set.remove(url.trim()) {
            return Ok(false);
        }
        self.write_set(&set)?;
        Ok(true)
    }

    fn is_bookmarked(&self, url: &str, privacy: &PrivacySettings) -> bool {
        if privacy.private_mode {
            return false;
        }
        match self.read_set() {
            Ok(set) => set.contains(url.trim()),
            Err(e) => {
                warn!(error = %e, "bookmark store unavailable");
                false
            }
        }
    }

    fn list_bookmarks(&self, privacy: &PrivacySettings) -> Option<Vec<String>> {
        if privacy.private_mode {
            return None;
        }
        match self.read_set() {
            Ok(set) => Some(set.into_urls()),
            Err(e) => {
                warn!(error = %e, "bookmark store unavailable, showing no bookmarks");
                Some(Vec::new())
            }
        }
    }

    fn clear_bookmarks(&mut self) -> Result<(), BookmarkError> {
        self.store.remove(keys::BOOKMARKS)?;
        Ok(())
    }
}
