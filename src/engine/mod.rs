//! Engine Bridge contract.
//!
//! The rendering engine is external to this crate. A tab's navigation session talks
//! to it only through [`EngineBridge`] (intents out) and an [`EventSink`] handed over
//! in [`EngineBridge::attach`] (events back). Events travel over an unbounded tokio
//! channel, so the engine may emit from any thread at any time; the session drains
//! them on the control thread.

pub mod scripted;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::types::navigation::NavigationToken;
use crate::types::tab::TabId;

/// What the engine observed.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    /// Load progress in `0.0..=1.0`.
    Progress(f64),
    /// The navigation committed and finished loading.
    NavigationFinished {
        url: String,
        title: Option<String>,
        can_go_back: bool,
        can_go_forward: bool,
    },
    /// The navigation ended without a page (DNS failure, TLS error, aborted...).
    NavigationFailed { url: String, reason: String },
    TitleChanged(String),
    /// The committed URL changed without a full load (redirect, fragment, pushState).
    UrlChanged(String),
    /// The page asked for a new browsing context (`target=_blank`, `window.open`).
    NewWindowRequested(String),
}

/// An engine event stamped with the navigation token it was produced under.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub token: NavigationToken,
    pub kind: EngineEventKind,
}

/// Sending half of a session's event subscription.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: UnboundedSender<EngineEvent>,
}

impl EventSink {
    /// Creates a subscription. The receiver stays with the session.
    pub fn channel() -> (Self, UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Delivers an event. Returns `false` once the session is gone.
    pub fn emit(&self, token: NavigationToken, kind: EngineEventKind) -> bool {
        self.tx.send(EngineEvent { token, kind }).is_ok()
    }

    /// New-window callback. `true` means the core took the request and the engine
    /// must not open a window of its own.
    pub fn request_new_window(&self, token: NavigationToken, url: &str) -> bool {
        self.emit(token, EngineEventKind::NewWindowRequested(url.to_string()))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Intents a navigation session issues to its engine instance.
///
/// Every intent carries the session's newest token; the engine stamps everything it
/// emits afterwards with that token and abandons work started under older ones.
pub trait EngineBridge: Send {
    /// Registers the event subscription. Called once when the session is created.
    fn attach(&mut self, sink: EventSink);
    /// Drops the subscription. Called when the session is torn down.
    fn detach(&mut self);
    fn load_url(&mut self, url: &str, token: NavigationToken);
    fn go_back(&mut self, token: NavigationToken);
    fn go_forward(&mut self, token: NavigationToken);
    fn reload(&mut self, token: NavigationToken);
    /// Best-effort cancellation of everything older than `token`.
    fn stop(&mut self, token: NavigationToken);
}

/// Creates one engine instance per tab.
pub trait EngineFactory: Send {
    fn create(&mut self, tab: TabId) -> Box<dyn EngineBridge>;
}
