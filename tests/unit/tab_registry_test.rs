use gitbrowser_core::engine::scripted::{EngineCommand, ScriptedEngineFactory};
use gitbrowser_core::engine::EngineEventKind;
use gitbrowser_core::managers::tab_registry::{RegistryNotice, TabRegistry, TabRegistryTrait};
use gitbrowser_core::types::errors::{NavigationError, TabError};
use gitbrowser_core::types::navigation::{PendingIntent, PseudoAddress, SETTINGS_PAGE, START_PAGE};
use gitbrowser_core::types::settings::NewWindowPolicy;
use gitbrowser_core::types::tab::TabId;

fn registry() -> (TabRegistry, ScriptedEngineFactory) {
    let engines = ScriptedEngineFactory::new();
    (TabRegistry::new(Box::new(engines.clone())), engines)
}

#[test]
fn test_new_registry_has_one_start_page_tab() {
    let (reg, engines) = registry();
    assert_eq!(reg.tab_count(), 1);
    let tab = reg.selected_tab();
    assert_eq!(tab.address(), START_PAGE);
    assert_eq!(tab.panel(), Some(PseudoAddress::StartPage));
    assert_eq!(tab.title(), Some("New Tab"));
    assert!(!tab.session().is_loading());

    // Panels never reach the engine.
    let engine = engines.handle(tab.id()).unwrap();
    assert!(!engine
        .commands()
        .iter()
        .any(|c| matches!(c, EngineCommand::Load { .. })));
}

#[test]
fn test_open_tab_appends_selects_and_loads() {
    let (mut reg, engines) = registry();
    let first = reg.selected_tab_id();
    let id = reg.open_tab("https://github.com");

    assert_eq!(reg.tab_count(), 2);
    assert_eq!(reg.selected_tab_id(), id);
    assert_eq!(reg.get_all_tabs()[0].id(), first);
    assert_eq!(reg.get_all_tabs()[1].id(), id);

    let tab = reg.get_tab(id).unwrap();
    assert_eq!(tab.address(), "https://github.com");
    assert_eq!(tab.session().target_url(), Some("https://github.com"));
    assert!(engines
        .handle(id)
        .unwrap()
        .commands()
        .iter()
        .any(|c| matches!(c, EngineCommand::Load { url, .. } if url == "https://github.com")));
}

#[test]
fn test_open_tab_with_settings_address_shows_panel() {
    let (mut reg, _engines) = registry();
    let id = reg.open_tab(SETTINGS_PAGE);
    let tab = reg.get_tab(id).unwrap();
    assert_eq!(tab.panel(), Some(PseudoAddress::Settings));
    assert_eq!(tab.title(), Some("Settings"));
    assert!(!tab.session().is_loading());
}

#[test]
fn test_select_unknown_tab_is_silent_noop() {
    let (mut reg, _engines) = registry();
    let selected = reg.selected_tab_id();
    assert!(!reg.select_tab(TabId::new()));
    assert_eq!(reg.selected_tab_id(), selected);
}

#[test]
fn test_duplicate_tab_copies_address_with_idle_session() {
    let (mut reg, engines) = registry();
    let a = reg.open_tab("https://a.example");
    let b = reg.open_tab("https://b.example");
    engines.handle(a).unwrap().finish("https://a.example", Some("A"), false, false);
    reg.pump_events(NewWindowPolicy::OpenTab);

    let copy = reg.duplicate_tab(a).unwrap();
    assert_ne!(copy, a);
    assert_eq!(reg.selected_tab_id(), copy);

    let ids = reg.tab_ids();
    let pos = ids.iter().position(|id| *id == a).unwrap();
    assert_eq!(ids[pos + 1], copy);
    assert_eq!(ids[pos + 2], b);

    let tab = reg.get_tab(copy).unwrap();
    assert_eq!(tab.address(), "https://a.example");
    assert_eq!(tab.title(), Some("A"));
    assert_eq!(tab.session().pending_intent(), &PendingIntent::None);
    assert_eq!(tab.session().load_progress(), 0.0);
    assert_eq!(tab.session().current_url(), None);
}

#[test]
fn test_reload_of_duplicate_loads_its_address() {
    let (mut reg, engines) = registry();
    let a = reg.open_tab("https://a.example");
    let copy = reg.duplicate_tab(a).unwrap();

    reg.reload(copy).unwrap();
    let tab = reg.get_tab(copy).unwrap();
    assert_eq!(tab.session().target_url(), Some("https://a.example"));
    assert!(engines
        .handle(copy)
        .unwrap()
        .commands()
        .iter()
        .any(|c| matches!(c, EngineCommand::Load { .. })));
}

#[test]
fn test_duplicate_unknown_tab_fails() {
    let (mut reg, _engines) = registry();
    let missing = TabId::new();
    assert!(matches!(reg.duplicate_tab(missing), Err(TabError::NotFound(id)) if id == missing));
}

#[test]
fn test_close_only_tab_opens_start_page() {
    let (mut reg, engines) = registry();
    let only = reg.selected_tab_id();
    reg.close_tab(only).unwrap();

    assert_eq!(reg.tab_count(), 1);
    let tab = reg.selected_tab();
    assert_ne!(tab.id(), only);
    assert_eq!(tab.address(), START_PAGE);
    assert!(!engines.handle(only).unwrap().is_attached());
}

#[test]
fn test_close_selected_tab_selects_same_index() {
    let (mut reg, _engines) = registry();
    let first = reg.selected_tab_id();
    let second = reg.open_tab("https://two.example");
    let third = reg.open_tab("https://three.example");

    reg.select_tab(second);
    reg.close_tab(second).unwrap();
    assert_eq!(reg.selected_tab_id(), third);

    reg.close_tab(third).unwrap();
    assert_eq!(reg.selected_tab_id(), first);
}

#[test]
fn test_close_unselected_tab_keeps_selection() {
    let (mut reg, _engines) = registry();
    let first = reg.selected_tab_id();
    let second = reg.open_tab("https://two.example");
    reg.close_tab(first).unwrap();
    assert_eq!(reg.selected_tab_id(), second);
    assert_eq!(reg.tab_count(), 1);
}

#[test]
fn test_close_unknown_tab_fails() {
    let (mut reg, _engines) = registry();
    assert!(reg.close_tab(TabId::new()).is_err());
    assert_eq!(reg.tab_count(), 1);
}

#[test]
fn test_next_and_previous_wrap() {
    let (mut reg, _engines) = registry();
    let first = reg.selected_tab_id();
    let second = reg.open_tab("https://two.example");
    let third = reg.open_tab("https://three.example");

    assert_eq!(reg.next_tab(), first);
    assert_eq!(reg.next_tab(), second);
    assert_eq!(reg.previous_tab(), first);
    assert_eq!(reg.previous_tab(), third);
}

#[test]
fn test_next_on_single_tab_stays() {
    let (mut reg, _engines) = registry();
    let only = reg.selected_tab_id();
    assert_eq!(reg.next_tab(), only);
    assert_eq!(reg.previous_tab(), only);
}

#[test]
fn test_reorder_tab() {
    let (mut reg, _engines) = registry();
    let first = reg.selected_tab_id();
    let second = reg.open_tab("https://two.example");
    let third = reg.open_tab("https://three.example");

    reg.reorder_tab(third, 0).unwrap();
    assert_eq!(reg.tab_ids(), vec![third, first, second]);
    assert!(matches!(reg.reorder_tab(first, 3), Err(TabError::InvalidIndex(3))));
}

#[test]
fn test_close_other_tabs() {
    let (mut reg, _engines) = registry();
    reg.open_tab("https://two.example");
    let keep = reg.open_tab("https://three.example");
    reg.open_tab("https://four.example");

    reg.close_other_tabs(keep).unwrap();
    assert_eq!(reg.tab_ids(), vec![keep]);
    assert_eq!(reg.selected_tab_id(), keep);
}

#[test]
fn test_commit_updates_tab_address_and_title() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://example.com");
    let engine = engines.handle(id).unwrap();
    engine.finish("https://www.example.com/", Some("Example Domain"), true, false);

    assert!(reg.pump_events(NewWindowPolicy::OpenTab).is_empty());
    let tab = reg.get_tab(id).unwrap();
    assert_eq!(tab.address(), "https://www.example.com/");
    assert_eq!(tab.title(), Some("Example Domain"));
    assert!(tab.session().can_go_back());
}

#[test]
fn test_failure_is_reported_as_notice() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://down.example");
    engines.handle(id).unwrap().fail("https://down.example", "timeout");

    let notices = reg.pump_events(NewWindowPolicy::OpenTab);
    assert_eq!(notices.len(), 1);
    match &notices[0] {
        RegistryNotice::NavigationFailed { tab, failure } => {
            assert_eq!(*tab, id);
            assert_eq!(failure.reason, "timeout");
        }
        other => panic!("unexpected notice {:?}", other),
    }
    let snapshot = reg.snapshot();
    assert_eq!(
        snapshot.tabs[1].last_error.as_deref(),
        Some("https://down.example (timeout)")
    );
}

#[test]
fn test_new_window_request_opens_tab() {
    let (mut reg, engines) = registry();
    let opener = reg.open_tab("https://opener.example");
    engines.handle(opener).unwrap().request_new_window("https://popup.example");

    let notices = reg.pump_events(NewWindowPolicy::OpenTab);
    assert_eq!(reg.tab_count(), 3);
    match &notices[..] {
        [RegistryNotice::TabOpened { tab, opener: from, url }] => {
            assert_eq!(*from, opener);
            assert_eq!(url, "https://popup.example");
            assert_eq!(reg.selected_tab_id(), *tab);
        }
        other => panic!("unexpected notices {:?}", other),
    }
}

#[test]
fn test_new_window_request_loads_in_place() {
    let (mut reg, engines) = registry();
    let opener = reg.open_tab("https://opener.example");
    engines.handle(opener).unwrap().request_new_window("https://popup.example");

    let notices = reg.pump_events(NewWindowPolicy::LoadInPlace);
    assert_eq!(reg.tab_count(), 2);
    assert_eq!(
        notices,
        vec![RegistryNotice::LoadedInPlace {
            tab: opener,
            url: "https://popup.example".to_string(),
        }]
    );
    assert_eq!(
        reg.get_tab(opener).unwrap().session().target_url(),
        Some("https://popup.example")
    );
}

#[test]
fn test_new_window_request_for_internal_page_is_refused() {
    let (mut reg, engines) = registry();
    let opener = reg.open_tab("https://opener.example");
    engines.handle(opener).unwrap().request_new_window(SETTINGS_PAGE);

    assert!(reg.pump_events(NewWindowPolicy::OpenTab).is_empty());
    assert_eq!(reg.tab_count(), 2);
}

#[test]
fn test_navigation_intents_by_id() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://one.example");
    let engine = engines.handle(id).unwrap();

    assert!(matches!(
        reg.go_back(id),
        Err(TabError::Navigation { source: NavigationError::CannotGoBack, .. })
    ));

    engine.finish("https://one.example", None, false, false);
    reg.pump_events(NewWindowPolicy::OpenTab);
    reg.load(id, "https://two.example").unwrap();
    assert_eq!(reg.get_tab(id).unwrap().address(), "https://two.example");
    assert!(reg.stop(id).unwrap());
    assert!(!reg.stop(id).unwrap());

    reg.reload(id).unwrap();
    assert_eq!(
        reg.get_tab(id).unwrap().session().pending_intent(),
        &PendingIntent::Reload
    );
    assert!(matches!(reg.load(TabId::new(), "https://x.example"), Err(TabError::NotFound(_))));
}

#[test]
fn test_load_internal_address_routes_to_panel() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://busy.example");
    reg.load(id, SETTINGS_PAGE).unwrap();

    let tab = reg.get_tab(id).unwrap();
    assert_eq!(tab.panel(), Some(PseudoAddress::Settings));
    assert!(!tab.session().is_loading());
    assert!(matches!(
        engines.handle(id).unwrap().commands().last(),
        Some(EngineCommand::Stop(_))
    ));

    // Panels render locally; reloading them is a no-op.
    reg.reload(id).unwrap();
    assert!(!reg.get_tab(id).unwrap().session().is_loading());
}

#[test]
fn test_snapshot_reflects_tabs_in_order() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://snap.example");
    engines.handle(id).unwrap().emit(EngineEventKind::Progress(0.25));
    reg.pump_events(NewWindowPolicy::OpenTab);

    let snapshot = reg.snapshot();
    assert_eq!(snapshot.selected_tab_id, id);
    assert_eq!(snapshot.tabs.len(), 2);
    assert_eq!(snapshot.tabs[0].address, START_PAGE);
    assert_eq!(snapshot.tabs[1].address, "https://snap.example");
    assert_eq!(snapshot.tabs[1].load_progress, 0.25);
    assert_eq!(
        snapshot.tabs[1].pending_intent,
        PendingIntent::Load("https://snap.example".to_string())
    );

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("https://snap.example"));
}

#[test]
fn test_panel_tab_ignores_page_behind_it() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://page.example");
    let engine = engines.handle(id).unwrap();
    engine.finish("https://page.example", Some("Page"), false, false);
    reg.pump_events(NewWindowPolicy::OpenTab);
    let page_token = engine.last_token();

    reg.load(id, SETTINGS_PAGE).unwrap();
    engine.emit(EngineEventKind::TitleChanged("Page (1 unread)".to_string()));
    engine.emit(EngineEventKind::UrlChanged("https://page.example/#inbox".to_string()));
    engine.emit_with_token(page_token, EngineEventKind::TitleChanged("Page (2 unread)".to_string()));
    assert!(reg.pump_events(NewWindowPolicy::OpenTab).is_empty());

    let tab = reg.get_tab(id).unwrap();
    assert_eq!(tab.panel(), Some(PseudoAddress::Settings));
    assert_eq!(tab.address(), SETTINGS_PAGE);
    assert_eq!(tab.title(), Some("Settings"));
    assert_ne!(tab.session().token(), page_token);
}

#[test]
fn test_back_from_panel_returns_to_page() {
    let (mut reg, engines) = registry();
    let id = reg.open_tab("https://first.example");
    let engine = engines.handle(id).unwrap();
    engine.finish("https://first.example", Some("First"), true, true);
    reg.pump_events(NewWindowPolicy::OpenTab);

    reg.load(id, SETTINGS_PAGE).unwrap();
    let snapshot = reg.snapshot();
    assert!(snapshot.tabs[1].can_go_back);
    assert!(!snapshot.tabs[1].can_go_forward);
    assert!(matches!(
        reg.go_forward(id),
        Err(TabError::Navigation { source: NavigationError::CannotGoForward, .. })
    ));

    // Switching between panels keeps the page to return to.
    reg.load(id, START_PAGE).unwrap();
    assert!(reg.get_tab(id).unwrap().can_go_back());

    reg.go_back(id).unwrap();
    let tab = reg.get_tab(id).unwrap();
    assert_eq!(tab.panel(), None);
    assert_eq!(tab.address(), "https://first.example");
    assert_eq!(tab.session().target_url(), Some("https://first.example"));
}

#[test]
fn test_panel_opened_fresh_has_no_history() {
    let (mut reg, _engines) = registry();
    let id = reg.open_tab(SETTINGS_PAGE);
    let tab = reg.get_tab(id).unwrap();
    assert!(!tab.can_go_back());
    assert!(!tab.can_go_forward());
    assert!(matches!(
        reg.go_back(id),
        Err(TabError::Navigation { source: NavigationError::CannotGoBack, .. })
    ));
}
