//! GitBrowser core: tab registry, per-tab navigation sessions, and address resolution.
//!
//! The rendering engine lives outside this crate and is reached through
//! [`engine::EngineBridge`]. Settings and bookmarks persist through a
//! [`store::PersistentStore`].

pub mod app;
pub mod database;
pub mod engine;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod store;
pub mod types;
