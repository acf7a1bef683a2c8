use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::engine::EngineFactory;
use crate::managers::navigation_session::{NavigationSession, SessionSignal};
use crate::types::errors::{NavigationError, TabError};
use crate::types::navigation::{NavigationFailure, PseudoAddress, START_PAGE};
use crate::types::settings::NewWindowPolicy;
use crate::types::tab::{RegistrySnapshot, TabId, TabSnapshot};

/// A browser tab and the navigation session it owns for its whole lifetime.
pub struct Tab {
    id: TabId,
    address: String,
    title: Option<String>,
    created_at: i64,
    session: NavigationSession,
    /// Web page a panel was opened over; going back from the panel returns to it.
    return_to: Option<String>,
}

impl Tab {
    pub fn id(&self) -> TabId {
        self.id
    }

    /// The committed or pending address.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// The internal panel this tab shows instead of web content, if any.
    pub fn panel(&self) -> Option<PseudoAddress> {
        PseudoAddress::parse(&self.address)
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    /// Panels ignore the engine's history: back leads to the page the panel
    /// replaced, and there is never a forward entry.
    pub fn can_go_back(&self) -> bool {
        match self.panel() {
            Some(_) => self.return_to.is_some(),
            None => self.session.can_go_back(),
        }
    }

    pub fn can_go_forward(&self) -> bool {
        self.panel().is_none() && self.session.can_go_forward()
    }

    pub fn snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            id: self.id,
            address: self.address.clone(),
            title: self.title.clone(),
            pending_intent: self.session.pending_intent().clone(),
            load_progress: self.session.load_progress(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
            last_error: self.session.last_error().map(|f| f.to_string()),
        }
    }
}

/// Something the presentation layer should surface after events were pumped.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryNotice {
    /// A navigation failed; the tab keeps its previous page and can be retried.
    NavigationFailed { tab: TabId, failure: NavigationFailure },
    /// A page's new-window request opened a tab.
    TabOpened { tab: TabId, opener: TabId, url: String },
    /// A page's new-window request was loaded into the requesting tab.
    LoadedInPlace { tab: TabId, url: String },
}

/// Trait defining the tab registry interface.
pub trait TabRegistryTrait {
    fn open_tab(&mut self, address: &str) -> TabId;
    /// Returns `false` (and changes nothing) when `tab_id` is unknown.
    fn select_tab(&mut self, tab_id: TabId) -> bool;
    fn duplicate_tab(&mut self, tab_id: TabId) -> Result<TabId, TabError>;
    fn close_tab(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn next_tab(&mut self) -> TabId;
    fn previous_tab(&mut self) -> TabId;
    fn reorder_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<(), TabError>;
    fn close_other_tabs(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn get_tab(&self, tab_id: TabId) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn selected_tab(&self) -> &Tab;
    fn selected_tab_id(&self) -> TabId;
    fn tab_count(&self) -> usize;
}

/// Ordered, never-empty collection of tabs.
pub struct TabRegistry {
    tabs: Vec<Tab>,
    selected: TabId,
    engines: Box<dyn EngineFactory>,
}

impl TabRegistry {
    /// Creates a registry holding a single start-page tab.
    pub fn new(engines: Box<dyn EngineFactory>) -> Self {
        Self::with_initial_tab(engines, START_PAGE)
    }

    /// Creates a registry whose first tab opens `address`.
    pub fn with_initial_tab(mut engines: Box<dyn EngineFactory>, address: &str) -> Self {
        let first = Self::build_tab(engines.as_mut(), Self::normalize(address), None);
        let selected = first.id;
        let mut registry = Self {
            tabs: vec![first],
            selected,
            engines,
        };
        registry.start(0);
        registry
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn normalize(address: &str) -> &str {
        let address = address.trim();
        if address.is_empty() {
            START_PAGE
        } else {
            address
        }
    }

    fn build_tab(engines: &mut dyn EngineFactory, address: &str, title: Option<String>) -> Tab {
        let id = TabId::new();
        let engine = engines.create(id);
        Tab {
            id,
            address: address.to_string(),
            title,
            created_at: Self::now(),
            session: NavigationSession::new(id, engine),
            return_to: None,
        }
    }

    fn find_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn require_index(&self, tab_id: TabId) -> Result<usize, TabError> {
        self.find_index(tab_id).ok_or(TabError::NotFound(tab_id))
    }

    fn selected_index(&self) -> usize {
        self.find_index(self.selected).unwrap_or(0)
    }

    /// Kicks off the tab's current address after creation.
    fn start(&mut self, index: usize) {
        let address = self.tabs[index].address.clone();
        if let Err(e) = self.navigate_index(index, &address) {
            warn!(tab = %self.tabs[index].id, error = %e, "new tab could not start loading");
        }
    }

    /// Routes `url` to the internal panel or the engine.
    fn navigate_index(&mut self, index: usize, url: &str) -> Result<(), NavigationError> {
        let tab = &mut self.tabs[index];
        if let Some(panel) = PseudoAddress::parse(url) {
            if tab.panel().is_none() {
                tab.return_to = tab.session.current_url().map(str::to_string);
            }
            tab.session.yield_to_panel();
            tab.address = panel.as_str().to_string();
            tab.title = Some(panel.title().to_string());
            return Ok(());
        }
        tab.session.load(url)?;
        tab.address = url.trim().to_string();
        tab.return_to = None;
        Ok(())
    }

    fn wrap(tab_id: TabId) -> impl FnOnce(NavigationError) -> TabError {
        move |source| TabError::Navigation { tab: tab_id, source }
    }

    // === Navigation intents ===

    /// Loads an already resolved address into a tab.
    pub fn load(&mut self, tab_id: TabId, url: &str) -> Result<(), TabError> {
        let index = self.require_index(tab_id)?;
        self.navigate_index(index, url).map_err(Self::wrap(tab_id))
    }

    /// Goes back in the engine's history, or from a panel to the page it replaced.
    pub fn go_back(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let index = self.require_index(tab_id)?;
        let tab = &self.tabs[index];
        if tab.panel().is_some() {
            let target = tab.return_to.clone().ok_or(NavigationError::CannotGoBack);
            return target
                .and_then(|url| self.navigate_index(index, &url))
                .map_err(Self::wrap(tab_id));
        }
        self.tabs[index]
            .session
            .go_back()
            .map(|_| ())
            .map_err(Self::wrap(tab_id))
    }

    pub fn go_forward(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let index = self.require_index(tab_id)?;
        if self.tabs[index].panel().is_some() {
            return Err(Self::wrap(tab_id)(NavigationError::CannotGoForward));
        }
        self.tabs[index]
            .session
            .go_forward()
            .map(|_| ())
            .map_err(Self::wrap(tab_id))
    }

    /// Reloads a tab. Panels render locally, so reloading one does nothing.
    pub fn reload(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let index = self.require_index(tab_id)?;
        let tab = &mut self.tabs[index];
        if tab.panel().is_some() {
            return Ok(());
        }
        if tab.session.current_url().is_none() && !tab.session.is_loading() {
            // A duplicated tab has an address but has never loaded it.
            let address = tab.address.clone();
            return self.navigate_index(index, &address).map_err(Self::wrap(tab_id));
        }
        tab.session.reload().map(|_| ()).map_err(Self::wrap(tab_id))
    }

    /// Returns whether a navigation was actually stopped.
    pub fn stop(&mut self, tab_id: TabId) -> Result<bool, TabError> {
        let index = self.require_index(tab_id)?;
        Ok(self.tabs[index].session.stop())
    }

    // === Engine events ===

    /// Drains every session's engine events and applies the results.
    ///
    /// New-window requests are honoured per `policy` after all sessions have been
    /// drained. Requests for internal pages are refused. A tab showing a panel keeps
    /// its panel address and title whatever the engine reports.
    pub fn pump_events(&mut self, policy: NewWindowPolicy) -> Vec<RegistryNotice> {
        let mut notices = Vec::new();
        let mut requests = Vec::new();

        for tab in &mut self.tabs {
            let on_panel = tab.panel().is_some();
            for signal in tab.session.pump() {
                match signal {
                    SessionSignal::Committed { .. }
                    | SessionSignal::UrlChanged(_)
                    | SessionSignal::TitleChanged(_)
                        if on_panel =>
                    {
                        debug!(tab = %tab.id, "ignoring page update behind panel");
                    }
                    SessionSignal::Committed { url, title } => {
                        tab.address = url;
                        tab.title = title;
                    }
                    SessionSignal::UrlChanged(url) => tab.address = url,
                    SessionSignal::TitleChanged(title) => tab.title = Some(title),
                    SessionSignal::Failed(failure) => {
                        notices.push(RegistryNotice::NavigationFailed { tab: tab.id, failure });
                    }
                    SessionSignal::NewTabRequested(url) => requests.push((tab.id, url)),
                }
            }
        }

        for (opener, url) in requests {
            if PseudoAddress::parse(&url).is_some() || url.trim().is_empty() {
                warn!(tab = %opener, %url, "refusing new-window request");
                continue;
            }
            match policy {
                NewWindowPolicy::OpenTab => {
                    let tab = self.open_tab(&url);
                    notices.push(RegistryNotice::TabOpened { tab, opener, url });
                }
                NewWindowPolicy::LoadInPlace => match self.load(opener, &url) {
                    Ok(()) => notices.push(RegistryNotice::LoadedInPlace { tab: opener, url }),
                    Err(e) => warn!(error = %e, "new-window request could not load in place"),
                },
            }
        }

        notices
    }

    /// Current state of every tab for the presentation layer.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            tabs: self.tabs.iter().map(Tab::snapshot).collect(),
            selected_tab_id: self.selected,
        }
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }
}

impl TabRegistryTrait for TabRegistry {
    /// Opens a tab at the end of the strip, selects it, and starts loading.
    fn open_tab(&mut self, address: &str) -> TabId {
        let address = Self::normalize(address);
        let tab = Self::build_tab(self.engines.as_mut(), address, None);
        let id = tab.id;
        self.tabs.push(tab);
        self.selected = id;
        self.start(self.tabs.len() - 1);
        info!(tab = %id, address, count = self.tabs.len(), "opened tab");
        id
    }

    fn select_tab(&mut self, tab_id: TabId) -> bool {
        if self.find_index(tab_id).is_none() {
            return false;
        }
        self.selected = tab_id;
        true
    }

    /// Opens a copy right after the source. The copy gets a fresh, idle session
    /// and has to be reloaded to show content.
    fn duplicate_tab(&mut self, tab_id: TabId) -> Result<TabId, TabError> {
        let index = self.require_index(tab_id)?;
        let source = &self.tabs[index];
        let (address, title) = (source.address.clone(), source.title.clone());
        let return_to = source.return_to.clone();

        let mut tab = Self::build_tab(self.engines.as_mut(), &address, title);
        tab.return_to = return_to;
        let new_id = tab.id;
        self.tabs.insert(index + 1, tab);
        self.selected = new_id;
        info!(source = %tab_id, tab = %new_id, "duplicated tab");
        Ok(new_id)
    }

    /// Closes a tab. Closing the selected tab selects the one that slides into its
    /// slot (or the new last tab); closing the only tab opens a start-page tab.
    fn close_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let index = self.require_index(tab_id)?;
        let was_selected = self.selected == tab_id;

        // Dropping the tab tears down its session and engine subscription.
        drop(self.tabs.remove(index));
        info!(tab = %tab_id, remaining = self.tabs.len(), "closed tab");

        if self.tabs.is_empty() {
            self.open_tab(START_PAGE);
            return Ok(());
        }

        if was_selected {
            let new_index = index.min(self.tabs.len() - 1);
            self.selected = self.tabs[new_index].id;
        }
        Ok(())
    }

    fn next_tab(&mut self) -> TabId {
        let index = (self.selected_index() + 1) % self.tabs.len();
        self.selected = self.tabs[index].id;
        self.selected
    }

    fn previous_tab(&mut self) -> TabId {
        let len = self.tabs.len();
        let index = (self.selected_index() + len - 1) % len;
        self.selected = self.tabs[index].id;
        self.selected
    }

    /// Move a tab to a new position in the strip.
    fn reorder_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<(), TabError> {
        let index = self.require_index(tab_id)?;
        if new_index >= self.tabs.len() {
            return Err(TabError::InvalidIndex(new_index));
        }
        let tab = self.tabs.remove(index);
        self.tabs.insert(new_index, tab);
        debug!(tab = %tab_id, from = index, to = new_index, "reordered tab");
        Ok(())
    }

    /// Close all tabs except the specified one, which becomes selected.
    fn close_other_tabs(&mut self, tab_id: TabId) -> Result<(), TabError> {
        self.require_index(tab_id)?;
        self.tabs.retain(|t| t.id == tab_id);
        self.selected = tab_id;
        Ok(())
    }

    fn get_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn selected_tab(&self) -> &Tab {
        &self.tabs[self.selected_index()]
    }

    fn selected_tab_id(&self) -> TabId {
        self.selected
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
