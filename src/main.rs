//! GitBrowser core console demo.
//!
//! Drives the tab registry with the scripted engine so the navigation flow can be
//! watched without a web view. Pass `-v` or `-vv` for more log output.

use gitbrowser_core::app::App;
use gitbrowser_core::engine::scripted::ScriptedEngineFactory;
use gitbrowser_core::engine::EngineEventKind;
use gitbrowser_core::logging;
use gitbrowser_core::managers::tab_registry::TabRegistryTrait;
use gitbrowser_core::services::settings_engine::SettingsEngineTrait;
use gitbrowser_core::services::url_resolver;
use gitbrowser_core::types::settings::SearchEngine;

fn main() {
    let verbosity = std::env::args()
        .skip(1)
        .map(|arg| match arg.as_str() {
            "-v" => 1,
            "-vv" => 2,
            _ => 0,
        })
        .max()
        .unwrap_or(0);
    logging::init_logging(verbosity);

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            GitBrowser core v{} - Demo Mode               ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let engines = ScriptedEngineFactory::new();
    let mut app = App::in_memory(Box::new(engines.clone()));

    demo_resolver(&app);
    demo_navigation(&mut app, &engines);
    demo_tabs(&mut app, &engines);
    demo_bookmarks(&mut app);

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished with {} tab(s) open", app.tabs.tab_count());
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_resolver(app: &App) {
    section("URL Resolver");

    let search = app.settings().search_config();
    for input in ["apple.com", "weather today", "localhost:8080", "about:settings", ""] {
        println!("  {:<18} -> {}", format!("{:?}", input), url_resolver::resolve(input, &search));
    }
    println!();
}

fn demo_navigation(app: &mut App, engines: &ScriptedEngineFactory) {
    section("Navigation Session");

    let tab = app.tabs.selected_tab_id();
    let Some(engine) = engines.handle(tab) else {
        println!("  no engine for the selected tab");
        return;
    };

    match app.submit_address("rust-lang.org") {
        Ok(target) => println!("  Loading {}", target),
        Err(e) => println!("  Load rejected: {}", e),
    }
    let stale = engine.last_token();

    // A second submission supersedes the first before it finishes.
    let _ = app.submit_address("crates.io");
    engine.emit_with_token(
        stale,
        EngineEventKind::NavigationFinished {
            url: "https://rust-lang.org".to_string(),
            title: Some("Rust".to_string()),
            can_go_back: false,
            can_go_forward: false,
        },
    );
    engine.progress(0.4);
    engine.finish("https://crates.io", Some("crates.io"), true, false);
    app.pump();

    let current = app.tabs.selected_tab();
    println!("  Committed: {} ({:?})", current.address(), current.title());
    println!("  Progress: {:.0}%", current.session().load_progress() * 100.0);
    println!("  Can go back: {}", current.session().can_go_back());

    let _ = app.submit_address("does-not-exist.invalid");
    engine.fail("https://does-not-exist.invalid", "DNS lookup failed");
    for notice in app.pump() {
        println!("  Notice: {:?}", notice);
    }
    println!("  Still showing: {}", app.tabs.selected_tab().address());
    println!();
}

fn demo_tabs(app: &mut App, engines: &ScriptedEngineFactory) {
    section("Tab Registry");

    let second = app.open_new_tab();
    let settings = app.open_settings();
    println!("  Opened start page and settings, count = {}", app.tabs.tab_count());

    let copy = app.tabs.duplicate_tab(second).map(|id| id.to_string());
    println!("  Duplicated start page: {:?}", copy);

    if let Some(engine) = engines.handle(app.tabs.get_all_tabs()[0].id()) {
        engine.request_new_window("https://docs.rs");
    }
    for notice in app.pump() {
        println!("  Notice: {:?}", notice);
    }

    let _ = app.tabs.close_other_tabs(settings);
    let _ = app.tabs.close_tab(settings);
    println!(
        "  Closed everything, count = {}, showing {}",
        app.tabs.tab_count(),
        app.tabs.selected_tab().address()
    );

    match serde_json::to_string(&app.snapshot()) {
        Ok(json) => println!("  Snapshot: {}", json),
        Err(e) => println!("  Snapshot failed: {}", e),
    }
    println!();
}

fn demo_bookmarks(app: &mut App) {
    section("Bookmarks and Settings");

    let _ = app.submit_address("github.com");
    println!("  Bookmarked selected tab: {}", app.bookmark_selected_tab());
    println!("  Bookmarks: {:?}", app.list_bookmarks());

    let mut settings = app.settings();
    let _ = settings.set_private_mode(true);
    let _ = settings.set_search_engine(SearchEngine::Brave);
    println!("  Private mode on, bookmarks: {:?}", app.list_bookmarks());
    println!("  Search now goes to: {}", app.settings().load().search.template());

    let _ = app.clear_bookmarks();
    let _ = app.settings().reset();
    println!("  Cleared bookmarks and reset settings: {:?}", app.list_bookmarks());
}
