//! Navigation Session for GitBrowser.
//!
//! One session per tab. It owns the tab's engine instance and event subscription,
//! records the intent the user issued, and folds engine events back into the
//! UI-visible navigation state. Intents never block: their outcome arrives later as
//! events, which are matched against the session's current [`NavigationToken`] so
//! that results of superseded or stopped navigations are dropped.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, trace};

use crate::engine::{EngineBridge, EngineEvent, EngineEventKind, EventSink};
use crate::types::errors::NavigationError;
use crate::types::navigation::{NavigationFailure, NavigationToken, PendingIntent, PseudoAddress};
use crate::types::tab::TabId;

/// Outcome of an engine event that the owner of the session has to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    /// A navigation committed; `url` and `title` are the engine's report.
    Committed { url: String, title: Option<String> },
    UrlChanged(String),
    TitleChanged(String),
    /// A navigation failed. The previous page stays current.
    Failed(NavigationFailure),
    /// The page wants `url` opened in a new browsing context.
    NewTabRequested(String),
}

/// Navigation state machine of a single tab.
pub struct NavigationSession {
    tab_id: TabId,
    engine: Box<dyn EngineBridge>,
    events: UnboundedReceiver<EngineEvent>,
    token: NavigationToken,
    pending_intent: PendingIntent,
    load_progress: f64,
    can_go_back: bool,
    can_go_forward: bool,
    current_url: Option<String>,
    page_title: Option<String>,
    last_error: Option<NavigationFailure>,
}

impl NavigationSession {
    /// Creates an idle session and subscribes it to `engine`'s events.
    pub fn new(tab_id: TabId, mut engine: Box<dyn EngineBridge>) -> Self {
        let (sink, events) = EventSink::channel();
        engine.attach(sink);
        Self {
            tab_id,
            engine,
            events,
            token: NavigationToken::default(),
            pending_intent: PendingIntent::None,
            load_progress: 0.0,
            can_go_back: false,
            can_go_forward: false,
            current_url: None,
            page_title: None,
            last_error: None,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn pending_intent(&self) -> &PendingIntent {
        &self.pending_intent
    }

    /// The URL of the pending `load` intent, if that is what is pending.
    pub fn target_url(&self) -> Option<&str> {
        match &self.pending_intent {
            PendingIntent::Load(url) => Some(url),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.pending_intent.is_none()
    }

    pub fn load_progress(&self) -> f64 {
        self.load_progress
    }

    pub fn can_go_back(&self) -> bool {
        self.can_go_back
    }

    pub fn can_go_forward(&self) -> bool {
        self.can_go_forward
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn page_title(&self) -> Option<&str> {
        self.page_title.as_deref()
    }

    /// The most recent engine-reported failure, cleared by the next intent or commit.
    pub fn last_error(&self) -> Option<&NavigationFailure> {
        self.last_error.as_ref()
    }

    pub fn token(&self) -> NavigationToken {
        self.token
    }

    // === Intents ===

    /// Starts loading `url`, superseding any navigation in flight.
    ///
    /// `url` must already be resolved; internal pseudo-addresses are rejected because
    /// they never reach the engine.
    pub fn load(&mut self, url: &str) -> Result<NavigationToken, NavigationError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(NavigationError::EmptyTarget);
        }
        if PseudoAddress::parse(url).is_some() {
            return Err(NavigationError::InternalAddress(url.to_string()));
        }
        if let Some(previous) = self.target_url() {
            debug!(tab = %self.tab_id, previous, next = url, "superseding pending load");
        }

        let token = self.begin(PendingIntent::Load(url.to_string()));
        self.engine.load_url(url, token);
        Ok(token)
    }

    pub fn go_back(&mut self) -> Result<NavigationToken, NavigationError> {
        if !self.can_go_back {
            return Err(NavigationError::CannotGoBack);
        }
        let token = self.begin(PendingIntent::GoBack);
        self.engine.go_back(token);
        Ok(token)
    }

    pub fn go_forward(&mut self) -> Result<NavigationToken, NavigationError> {
        if !self.can_go_forward {
            return Err(NavigationError::CannotGoForward);
        }
        let token = self.begin(PendingIntent::GoForward);
        self.engine.go_forward(token);
        Ok(token)
    }

    /// Reloads the committed page. Before the first commit, restarts the pending load.
    pub fn reload(&mut self) -> Result<NavigationToken, NavigationError> {
        if self.current_url.is_none() {
            return match self.target_url().map(str::to_string) {
                Some(target) => self.load(&target),
                None => Err(NavigationError::NothingToReload),
            };
        }
        let token = self.begin(PendingIntent::Reload);
        self.engine.reload(token);
        Ok(token)
    }

    /// Abandons the navigation in flight without waiting for the engine.
    ///
    /// Returns `false` when the session was already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.token = self.token.next();
        self.pending_intent = PendingIntent::None;
        debug!(tab = %self.tab_id, token = %self.token, "navigation stopped");
        self.engine.stop(self.token);
        true
    }

    /// Hands the tab over to an internal panel.
    ///
    /// Unlike [`stop`](Self::stop) this always advances the token, so anything the
    /// engine still reports about the page behind the panel is treated as stale.
    pub fn yield_to_panel(&mut self) -> NavigationToken {
        self.token = self.token.next();
        self.pending_intent = PendingIntent::None;
        debug!(tab = %self.tab_id, token = %self.token, "session yielded to panel");
        self.engine.stop(self.token);
        self.token
    }

    fn begin(&mut self, intent: PendingIntent) -> NavigationToken {
        self.token = self.token.next();
        debug!(tab = %self.tab_id, token = %self.token, ?intent, "navigation intent");
        self.pending_intent = intent;
        self.load_progress = 0.0;
        self.last_error = None;
        self.token
    }

    // === Engine events ===

    /// Folds one engine event into the session state.
    pub fn apply_event(&mut self, event: EngineEvent) -> Option<SessionSignal> {
        if let EngineEventKind::NewWindowRequested(url) = &event.kind {
            return Some(SessionSignal::NewTabRequested(url.clone()));
        }

        if event.token != self.token {
            debug!(
                tab = %self.tab_id,
                event_token = %event.token,
                current = %self.token,
                "dropping stale engine event"
            );
            return None;
        }

        match event.kind {
            EngineEventKind::Progress(fraction) => {
                self.apply_progress(fraction);
                None
            }
            EngineEventKind::NavigationFinished {
                url,
                title,
                can_go_back,
                can_go_forward,
            } => {
                self.pending_intent = PendingIntent::None;
                self.load_progress = 1.0;
                self.can_go_back = can_go_back;
                self.can_go_forward = can_go_forward;
                self.current_url = Some(url.clone());
                self.page_title = title.clone();
                self.last_error = None;
                debug!(tab = %self.tab_id, %url, "navigation committed");
                Some(SessionSignal::Committed { url, title })
            }
            EngineEventKind::NavigationFailed { url, reason } => {
                self.pending_intent = PendingIntent::None;
                self.load_progress = 0.0;
                let failure = NavigationFailure { url, reason };
                debug!(tab = %self.tab_id, %failure, "navigation failed");
                self.last_error = Some(failure.clone());
                Some(SessionSignal::Failed(failure))
            }
            EngineEventKind::TitleChanged(title) => {
                self.page_title = Some(title.clone());
                Some(SessionSignal::TitleChanged(title))
            }
            EngineEventKind::UrlChanged(url) => {
                self.current_url = Some(url.clone());
                Some(SessionSignal::UrlChanged(url))
            }
            EngineEventKind::NewWindowRequested(_) => None,
        }
    }

    fn apply_progress(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);

        // After a completed navigation a lower value means the page started a
        // navigation of its own under the same token.
        let finished = self.pending_intent.is_none() && self.load_progress >= 1.0;
        if fraction < self.load_progress && !finished {
            trace!(tab = %self.tab_id, fraction, current = self.load_progress, "ignoring regressing progress");
            return;
        }

        if fraction >= 1.0 {
            self.pending_intent = PendingIntent::None;
            self.load_progress = 1.0;
        } else {
            self.load_progress = fraction;
        }
    }

    /// Applies every event delivered so far and returns the resulting signals.
    pub fn pump(&mut self) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if let Some(signal) = self.apply_event(event) {
                signals.push(signal);
            }
        }
        signals
    }

    /// Waits for the next event that produces a signal.
    ///
    /// Returns `None` once the engine has dropped its end of the subscription.
    pub async fn next_signal(&mut self) -> Option<SessionSignal> {
        while let Some(event) = self.events.recv().await {
            if let Some(signal) = self.apply_event(event) {
                return Some(signal);
            }
        }
        None
    }
}

impl Drop for NavigationSession {
    fn drop(&mut self) {
        if self.is_loading() {
            self.token = self.token.next();
            self.engine.stop(self.token);
        }
        self.engine.detach();
        self.events.close();
        debug!(tab = %self.tab_id, "navigation session torn down");
    }
}
