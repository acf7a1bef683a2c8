use thiserror::Error;

use super::tab::TabId;

// === TabError ===

/// Errors related to tab registry operations.
#[derive(Debug, Error)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(TabId),
    /// The provided tab index is out of bounds.
    #[error("Invalid tab index: {0}")]
    InvalidIndex(usize),
    /// The tab's navigation session rejected the intent.
    #[error("Navigation rejected for tab {tab}: {source}")]
    Navigation {
        tab: TabId,
        #[source]
        source: NavigationError,
    },
}

// === NavigationError ===

/// Errors raised when a navigation intent is not valid in the session's current state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    /// The engine has not reported a back entry.
    #[error("Cannot go back: no previous entry")]
    CannotGoBack,
    /// The engine has not reported a forward entry.
    #[error("Cannot go forward: no next entry")]
    CannotGoForward,
    /// Nothing has been committed yet, so there is nothing to reload.
    #[error("Nothing to reload")]
    NothingToReload,
    /// Pseudo-addresses are routed to internal panels and never reach the engine.
    #[error("Internal address cannot be loaded by the engine: {0}")]
    InternalAddress(String),
    /// The load target was empty.
    #[error("Empty navigation target")]
    EmptyTarget,
}

// === StoreError ===

/// Errors reported by a persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// Database operation failed.
    #[error("Store database error: {0}")]
    DatabaseError(String),
}

/// Failures to reach the database file at all (cannot open, busy, locked) are
/// `Unavailable`; everything else is a `DatabaseError`.
impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &e {
            rusqlite::Error::SqliteFailure(failure, _)
                if matches!(
                    failure.code,
                    ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
                ) =>
            {
                StoreError::Unavailable(e.to_string())
            }
            _ => StoreError::DatabaseError(e.to_string()),
        }
    }
}

// === BookmarkError ===

/// Errors related to bookmark persistence.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The stored bookmark list could not be read or written.
    #[error("Bookmark storage error: {0}")]
    Storage(#[from] StoreError),
    /// Failed to serialize the bookmark list.
    #[error("Bookmark serialization error: {0}")]
    SerializationError(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The store rejected a read or write.
    #[error("Settings storage error: {0}")]
    Storage(#[from] StoreError),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
