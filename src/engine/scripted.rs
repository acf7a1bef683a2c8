//! In-process engine that records intents and emits events on demand.
//!
//! Used by the console demo and the test suites in place of a real web view: each
//! [`ScriptedEngine`] shares its state with a cloneable [`ScriptedEngineHandle`] that
//! plays the part of the rendering engine's asynchronous callbacks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::{EngineBridge, EngineEventKind, EngineFactory, EventSink};
use crate::types::navigation::NavigationToken;
use crate::types::tab::TabId;

/// An intent as received by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Attach,
    Detach,
    Load { url: String, token: NavigationToken },
    GoBack(NavigationToken),
    GoForward(NavigationToken),
    Reload(NavigationToken),
    Stop(NavigationToken),
}

#[derive(Debug, Default)]
struct ScriptedState {
    commands: Vec<EngineCommand>,
    sink: Option<EventSink>,
    last_token: NavigationToken,
}

/// Engine half, owned by a navigation session.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedEngine {
    /// Creates an engine together with the handle that drives it.
    pub fn new() -> (Self, ScriptedEngineHandle) {
        let state = Arc::new(Mutex::new(ScriptedState::default()));
        (
            Self {
                state: state.clone(),
            },
            ScriptedEngineHandle { state },
        )
    }

    fn record(&self, command: EngineCommand, token: Option<NavigationToken>) {
        trace!(?command, "scripted engine received intent");
        let mut state = self.state.lock();
        if let Some(token) = token {
            state.last_token = token;
        }
        state.commands.push(command);
    }
}

impl EngineBridge for ScriptedEngine {
    fn attach(&mut self, sink: EventSink) {
        self.state.lock().sink = Some(sink);
        self.record(EngineCommand::Attach, None);
    }

    fn detach(&mut self) {
        self.state.lock().sink = None;
        self.record(EngineCommand::Detach, None);
    }

    fn load_url(&mut self, url: &str, token: NavigationToken) {
        self.record(
            EngineCommand::Load {
                url: url.to_string(),
                token,
            },
            Some(token),
        );
    }

    fn go_back(&mut self, token: NavigationToken) {
        self.record(EngineCommand::GoBack(token), Some(token));
    }

    fn go_forward(&mut self, token: NavigationToken) {
        self.record(EngineCommand::GoForward(token), Some(token));
    }

    fn reload(&mut self, token: NavigationToken) {
        self.record(EngineCommand::Reload(token), Some(token));
    }

    fn stop(&mut self, token: NavigationToken) {
        self.record(EngineCommand::Stop(token), Some(token));
    }
}

/// Engine-side controls: inspect received intents and fire events.
#[derive(Debug, Clone)]
pub struct ScriptedEngineHandle {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedEngineHandle {
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.state.lock().commands.clone()
    }

    /// Token of the most recent intent.
    pub fn last_token(&self) -> NavigationToken {
        self.state.lock().last_token
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().sink.is_some()
    }

    /// Emits under the most recent token. Returns `false` when nobody listens.
    pub fn emit(&self, kind: EngineEventKind) -> bool {
        let token = self.last_token();
        self.emit_with_token(token, kind)
    }

    /// Emits under an explicit token, e.g. to replay a superseded navigation.
    pub fn emit_with_token(&self, token: NavigationToken, kind: EngineEventKind) -> bool {
        let sink = self.state.lock().sink.clone();
        match sink {
            Some(sink) => sink.emit(token, kind),
            None => false,
        }
    }

    pub fn progress(&self, fraction: f64) -> bool {
        self.emit(EngineEventKind::Progress(fraction))
    }

    pub fn finish(&self, url: &str, title: Option<&str>, can_go_back: bool, can_go_forward: bool) -> bool {
        self.emit(EngineEventKind::NavigationFinished {
            url: url.to_string(),
            title: title.map(str::to_string),
            can_go_back,
            can_go_forward,
        })
    }

    pub fn fail(&self, url: &str, reason: &str) -> bool {
        self.emit(EngineEventKind::NavigationFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        })
    }

    pub fn request_new_window(&self, url: &str) -> bool {
        let (token, sink) = {
            let state = self.state.lock();
            (state.last_token, state.sink.clone())
        };
        sink.map(|s| s.request_new_window(token, url))
            .unwrap_or(false)
    }
}

/// Hands out [`ScriptedEngine`]s and remembers each tab's handle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngineFactory {
    handles: Arc<Mutex<HashMap<TabId, ScriptedEngineHandle>>>,
}

impl ScriptedEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle of the engine created for `tab`, if any.
    pub fn handle(&self, tab: TabId) -> Option<ScriptedEngineHandle> {
        self.handles.lock().get(&tab).cloned()
    }

    pub fn engines_created(&self) -> usize {
        self.handles.lock().len()
    }
}

impl EngineFactory for ScriptedEngineFactory {
    fn create(&mut self, tab: TabId) -> Box<dyn EngineBridge> {
        let (engine, handle) = ScriptedEngine::new();
        self.handles.lock().insert(tab, handle);
        Box::new(engine)
    }
}
