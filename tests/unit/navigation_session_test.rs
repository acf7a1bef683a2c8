use gitbrowser_core::engine::scripted::{EngineCommand, ScriptedEngine, ScriptedEngineHandle};
use gitbrowser_core::engine::{EngineEvent, EngineEventKind};
use gitbrowser_core::managers::navigation_session::{NavigationSession, SessionSignal};
use gitbrowser_core::types::errors::NavigationError;
use gitbrowser_core::types::navigation::{NavigationFailure, PendingIntent};
use gitbrowser_core::types::tab::TabId;

fn session() -> (NavigationSession, ScriptedEngineHandle) {
    let (engine, handle) = ScriptedEngine::new();
    (NavigationSession::new(TabId::new(), Box::new(engine)), handle)
}

fn finished(url: &str, back: bool, fwd: bool) -> EngineEventKind {
    EngineEventKind::NavigationFinished {
        url: url.to_string(),
        title: Some(format!("Title of {}", url)),
        can_go_back: back,
        can_go_forward: fwd,
    }
}

#[test]
fn test_new_session_is_idle_and_attached() {
    let (s, engine) = session();
    assert!(!s.is_loading());
    assert_eq!(s.load_progress(), 0.0);
    assert!(!s.can_go_back());
    assert!(!s.can_go_forward());
    assert_eq!(s.current_url(), None);
    assert!(engine.is_attached());
    assert_eq!(engine.commands(), vec![EngineCommand::Attach]);
}

#[test]
fn test_load_sets_pending_and_issues_intent() {
    let (mut s, engine) = session();
    let token = s.load("https://example.com").unwrap();

    assert_eq!(s.pending_intent(), &PendingIntent::Load("https://example.com".to_string()));
    assert_eq!(s.target_url(), Some("https://example.com"));
    assert!(engine.commands().contains(&EngineCommand::Load {
        url: "https://example.com".to_string(),
        token,
    }));
}

#[test]
fn test_finish_commits_navigation() {
    let (mut s, engine) = session();
    s.load("https://example.com").unwrap();
    engine.progress(0.5);
    engine.finish("https://example.com/", Some("Example"), true, false);

    let signals = s.pump();
    assert_eq!(
        signals,
        vec![SessionSignal::Committed {
            url: "https://example.com/".to_string(),
            title: Some("Example".to_string()),
        }]
    );
    assert!(!s.is_loading());
    assert_eq!(s.load_progress(), 1.0);
    assert_eq!(s.current_url(), Some("https://example.com/"));
    assert_eq!(s.page_title(), Some("Example"));
    assert!(s.can_go_back());
    assert!(!s.can_go_forward());
}

#[test]
fn test_stale_finish_does_not_change_current_url() {
    let (mut s, engine) = session();
    let first = s.load("https://a.example").unwrap();
    let second = s.load("https://b.example").unwrap();
    assert_ne!(first, second);

    engine.emit_with_token(first, finished("https://a.example", false, false));
    assert!(s.pump().is_empty());
    assert_eq!(s.current_url(), None);
    assert_eq!(s.target_url(), Some("https://b.example"));

    engine.emit(finished("https://b.example", false, false));
    s.pump();
    assert_eq!(s.current_url(), Some("https://b.example"));
}

#[test]
fn test_stop_clears_pending_and_drops_late_events() {
    let (mut s, engine) = session();
    let token = s.load("https://slow.example").unwrap();

    assert!(s.stop());
    assert!(!s.is_loading());
    assert!(!s.stop(), "stopping an idle session is a no-op");
    assert!(matches!(engine.commands().last(), Some(EngineCommand::Stop(_))));

    engine.emit_with_token(token, finished("https://slow.example", false, false));
    s.pump();
    assert_eq!(s.current_url(), None);
}

#[test]
fn test_yield_to_panel_outdates_idle_page() {
    let (mut s, engine) = session();
    let token = s.load("https://page.example").unwrap();
    engine.emit(finished("https://page.example", true, false));
    s.pump();
    assert!(!s.is_loading());

    let panel_token = s.yield_to_panel();
    assert_ne!(panel_token, token);
    assert_eq!(engine.commands().last(), Some(&EngineCommand::Stop(panel_token)));

    engine.emit_with_token(token, EngineEventKind::TitleChanged("Late".to_string()));
    assert!(s.pump().is_empty());
    assert_eq!(s.page_title(), Some("Title of https://page.example"));
}

#[test]
fn test_failure_keeps_previous_page() {
    let (mut s, engine) = session();
    s.load("https://ok.example").unwrap();
    engine.finish("https://ok.example", None, false, false);
    s.pump();

    s.load("https://broken.example").unwrap();
    engine.fail("https://broken.example", "connection refused");
    let signals = s.pump();

    let failure = NavigationFailure {
        url: "https://broken.example".to_string(),
        reason: "connection refused".to_string(),
    };
    assert_eq!(signals, vec![SessionSignal::Failed(failure.clone())]);
    assert!(!s.is_loading());
    assert_eq!(s.load_progress(), 0.0);
    assert_eq!(s.current_url(), Some("https://ok.example"));
    assert_eq!(s.last_error(), Some(&failure));

    // Retrying clears the error.
    s.reload().unwrap();
    assert_eq!(s.last_error(), None);
}

#[test]
fn test_back_and_forward_require_engine_flags() {
    let (mut s, engine) = session();
    assert_eq!(s.go_back(), Err(NavigationError::CannotGoBack));
    assert_eq!(s.go_forward(), Err(NavigationError::CannotGoForward));

    s.load("https://two.example").unwrap();
    engine.finish("https://two.example", None, true, false);
    s.pump();

    let token = s.go_back().unwrap();
    assert_eq!(s.pending_intent(), &PendingIntent::GoBack);
    assert_eq!(engine.commands().last(), Some(&EngineCommand::GoBack(token)));

    engine.finish("https://one.example", None, false, true);
    s.pump();
    assert_eq!(s.current_url(), Some("https://one.example"));
    assert!(s.go_forward().is_ok());
}

#[test]
fn test_reload_before_anything_loaded() {
    let (mut s, engine) = session();
    assert_eq!(s.reload(), Err(NavigationError::NothingToReload));

    s.load("https://pending.example").unwrap();
    let token = s.reload().unwrap();
    assert_eq!(
        engine.commands().last(),
        Some(&EngineCommand::Load {
            url: "https://pending.example".to_string(),
            token,
        })
    );
}

#[test]
fn test_load_rejects_internal_and_empty_targets() {
    let (mut s, engine) = session();
    assert_eq!(
        s.load("about:settings"),
        Err(NavigationError::InternalAddress("about:settings".to_string()))
    );
    assert_eq!(s.load("   "), Err(NavigationError::EmptyTarget));
    assert!(!s.is_loading());
    assert_eq!(engine.commands(), vec![EngineCommand::Attach]);
}

#[test]
fn test_title_and_url_changes_are_applied() {
    let (mut s, engine) = session();
    s.load("https://spa.example").unwrap();
    engine.finish("https://spa.example", None, false, false);
    engine.emit(EngineEventKind::UrlChanged("https://spa.example/#inbox".to_string()));
    engine.emit(EngineEventKind::TitleChanged("Inbox (3)".to_string()));
    s.pump();

    assert_eq!(s.current_url(), Some("https://spa.example/#inbox"));
    assert_eq!(s.page_title(), Some("Inbox (3)"));
}

#[test]
fn test_new_window_request_is_forwarded_even_when_stale() {
    let (mut s, _engine) = session();
    let old = s.token();
    s.load("https://popup.example").unwrap();

    let signal = s.apply_event(EngineEvent {
        token: old,
        kind: EngineEventKind::NewWindowRequested("https://ad.example".to_string()),
    });
    assert_eq!(
        signal,
        Some(SessionSignal::NewTabRequested("https://ad.example".to_string()))
    );
}

#[test]
fn test_drop_detaches_engine() {
    let (mut s, engine) = session();
    s.load("https://example.com").unwrap();
    drop(s);

    assert!(!engine.is_attached());
    let commands = engine.commands();
    let n = commands.len();
    assert!(matches!(commands[n - 2], EngineCommand::Stop(_)));
    assert_eq!(commands[n - 1], EngineCommand::Detach);
    assert!(!engine.progress(0.5), "nobody listens after teardown");
}

#[tokio::test]
async fn test_next_signal_waits_for_engine() {
    let (mut s, engine) = session();
    s.load("https://async.example").unwrap();

    let emitter = tokio::spawn(async move {
        tokio::task::yield_now().await;
        engine.progress(0.3);
        engine.finish("https://async.example", Some("Async"), false, false);
    });

    let signal = s.next_signal().await;
    emitter.await.unwrap();
    assert_eq!(
        signal,
        Some(SessionSignal::Committed {
            url: "https://async.example".to_string(),
            title: Some("Async".to_string()),
        })
    );
    assert!(!s.is_loading());
}
