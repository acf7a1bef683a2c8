// GitBrowser services
// Stateless over the store: address resolution and settings.

pub mod settings_engine;
pub mod url_resolver;
