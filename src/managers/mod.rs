// GitBrowser state managers
// Managers own mutable state: the tab list, each tab's navigation session, bookmarks.

pub mod bookmark_manager;
pub mod navigation_session;
pub mod tab_registry;
