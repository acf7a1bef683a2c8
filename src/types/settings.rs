use serde::{Deserialize, Serialize};

use super::navigation::START_PAGE;

/// Top-level browser settings container.
///
/// Assembled from individual store keys by the settings engine; callers take a
/// snapshot once per operation and pass the relevant part down.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BrowserSettings {
    pub general: GeneralSettings,
    pub search: SearchConfig,
    pub privacy: PrivacySettings,
    pub appearance: AppearanceSettings,
}

/// General browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub homepage: String,
    pub new_tab_page: NewTabPage,
    pub new_window_policy: NewWindowPolicy,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            homepage: START_PAGE.to_string(),
            new_tab_page: NewTabPage::StartPage,
            new_window_policy: NewWindowPolicy::OpenTab,
        }
    }
}

/// What a freshly opened tab shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NewTabPage {
    StartPage,
    Homepage,
}

/// How a page's request for a new browsing context is honoured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NewWindowPolicy {
    /// Open the target in a new, selected tab.
    OpenTab,
    /// Navigate the requesting tab to the target instead.
    LoadInPlace,
}

/// Built-in search providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    DuckDuckGo,
    Bing,
    Brave,
    Ecosia,
    /// Use the user-supplied template from `SearchConfig::custom_template`.
    Custom,
}

impl SearchEngine {
    /// Query template with a `{query}` placeholder. `None` for `Custom`.
    pub fn template(&self) -> Option<&'static str> {
        match self {
            SearchEngine::Google => Some("https://www.google.com/search?q={query}"),
            SearchEngine::DuckDuckGo => Some("https://duckduckgo.com/?q={query}"),
            SearchEngine::Bing => Some("https://www.bing.com/search?q={query}"),
            SearchEngine::Brave => Some("https://search.brave.com/search?q={query}"),
            SearchEngine::Ecosia => Some("https://www.ecosia.org/search?q={query}"),
            SearchEngine::Custom => None,
        }
    }
}

/// Search configuration consumed by the URL resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    pub engine: SearchEngine,
    pub custom_template: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::named(SearchEngine::DuckDuckGo)
    }
}

impl SearchConfig {
    pub fn named(engine: SearchEngine) -> Self {
        Self {
            engine,
            custom_template: None,
        }
    }

    pub fn custom(template: impl Into<String>) -> Self {
        Self {
            engine: SearchEngine::Custom,
            custom_template: Some(template.into()),
        }
    }

    /// The template to substitute into. A custom engine without a usable
    /// template falls back to the default provider.
    pub fn template(&self) -> &str {
        if let Some(t) = self.engine.template() {
            return t;
        }
        match self.custom_template.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => SearchEngine::DuckDuckGo.template().unwrap_or_default(),
        }
    }
}

/// Privacy-related settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PrivacySettings {
    /// Suppresses every bookmark read and write.
    pub private_mode: bool,
}

/// Appearance and visual settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceSettings {
    pub theme: ThemeMode,
    pub font_size: u32,
    #[serde(default)]
    pub compact_mode: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            font_size: 14,
            compact_mode: false,
        }
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}
