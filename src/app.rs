//! App Core for GitBrowser.
//!
//! Wires the persistent store, the tab registry, and the settings-driven services
//! together behind the operations the browser chrome calls.

use std::path::Path;

use tracing::{info, warn};

use crate::engine::EngineFactory;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::tab_registry::{RegistryNotice, TabRegistry, TabRegistryTrait};
use crate::platform;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::url_resolver;
use crate::store::memory::MemoryStore;
use crate::store::sqlite::SqliteStore;
use crate::store::PersistentStore;
use crate::types::errors::{BookmarkError, TabError};
use crate::types::navigation::{PseudoAddress, SETTINGS_PAGE, START_PAGE};
use crate::types::settings::NewTabPage;
use crate::types::tab::{RegistrySnapshot, TabId};

/// Central application struct.
///
/// Settings and bookmarks are not cached: `SettingsEngine` and `BookmarkManager`
/// borrow the store and are created on demand, so every operation sees the
/// latest stored values.
pub struct App {
    store: Box<dyn PersistentStore>,
    pub tabs: TabRegistry,
}

impl App {
    /// Opens the SQLite store at `path`, falling back to a volatile in-memory store
    /// when the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, engines: Box<dyn EngineFactory>) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(dir = %parent.display(), error = %e, "cannot create data directory");
            }
        }

        let store: Box<dyn PersistentStore> = match SqliteStore::open(path) {
            Ok(store) => {
                info!(path = %path.display(), "opened persistent store");
                Box::new(store)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "falling back to in-memory store");
                Box::new(MemoryStore::new())
            }
        };
        Self::with_store(store, engines)
    }

    /// Opens the store at the platform's default location.
    pub fn open_default(engines: Box<dyn EngineFactory>) -> Self {
        Self::open(platform::default_database_path(), engines)
    }

    /// Runs without persistence.
    pub fn in_memory(engines: Box<dyn EngineFactory>) -> Self {
        Self::with_store(Box::new(MemoryStore::new()), engines)
    }

    /// Builds the app over an existing store. The first tab follows the
    /// new-tab setting.
    pub fn with_store(store: Box<dyn PersistentStore>, engines: Box<dyn EngineFactory>) -> Self {
        let first = new_tab_address(store.as_ref());
        let tabs = TabRegistry::with_initial_tab(engines, &first);
        Self { store, tabs }
    }

    pub fn store(&self) -> &dyn PersistentStore {
        self.store.as_ref()
    }

    pub fn settings(&self) -> SettingsEngine<'_> {
        SettingsEngine::new(self.store.as_ref())
    }

    pub fn bookmarks(&self) -> BookmarkManager<'_> {
        BookmarkManager::new(self.store.as_ref())
    }

    /// Resolves what the user typed into the address bar and loads it into the
    /// selected tab. Returns the resolved address.
    pub fn submit_address(&mut self, input: &str) -> Result<String, TabError> {
        let search = self.settings().search_config();
        let target = url_resolver::resolve(input, &search);
        let tab = self.tabs.selected_tab_id();
        self.tabs.load(tab, &target)?;
        Ok(target)
    }

    /// Opens a tab showing whatever the new-tab setting asks for.
    pub fn open_new_tab(&mut self) -> TabId {
        let address = new_tab_address(self.store.as_ref());
        self.tabs.open_tab(&address)
    }

    /// Shows the settings panel, reusing an open settings tab if there is one.
    pub fn open_settings(&mut self) -> TabId {
        let existing = self
            .tabs
            .get_all_tabs()
            .iter()
            .find(|t| t.panel() == Some(PseudoAddress::Settings))
            .map(|t| t.id());
        match existing {
            Some(id) => {
                self.tabs.select_tab(id);
                id
            }
            None => self.tabs.open_tab(SETTINGS_PAGE),
        }
    }

    /// Bookmarks the selected tab's address. Internal panels are never bookmarked.
    ///
    /// Returns whether a bookmark was added; storage errors are logged, not raised.
    pub fn bookmark_selected_tab(&self) -> bool {
        let address = self.tabs.selected_tab().address().to_string();
        if PseudoAddress::parse(&address).is_some() {
            return false;
        }
        let privacy = self.settings().privacy();
        match self.bookmarks().add_bookmark(&address, &privacy) {
            Ok(added) => added,
            Err(e) => {
                warn!(error = %e, "could not save bookmark");
                false
            }
        }
    }

    /// Bookmarks to show, or `None` while private mode hides them.
    pub fn list_bookmarks(&self) -> Option<Vec<String>> {
        let privacy = self.settings().privacy();
        self.bookmarks().list_bookmarks(&privacy)
    }

    pub fn clear_bookmarks(&self) -> Result<(), BookmarkError> {
        self.bookmarks().clear_bookmarks()
    }

    /// Applies pending engine events under the configured new-window policy.
    pub fn pump(&mut self) -> Vec<RegistryNotice> {
        let policy = self.settings().load().general.new_window_policy;
        self.tabs.pump_events(policy)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.tabs.snapshot()
    }
}

fn new_tab_address(store: &dyn PersistentStore) -> String {
    let settings = SettingsEngine::new(store).load();
    match settings.general.new_tab_page {
        NewTabPage::StartPage => START_PAGE.to_string(),
        NewTabPage::Homepage => url_resolver::resolve(&settings.general.homepage, &settings.search),
    }
}
