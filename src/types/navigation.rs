use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of the built-in start page shown in blank tabs.
pub const START_PAGE: &str = "about:newtab";

/// Address of the built-in settings panel.
pub const SETTINGS_PAGE: &str = "about:settings";

/// Reserved addresses that are rendered by internal panels instead of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PseudoAddress {
    StartPage,
    Settings,
}

impl PseudoAddress {
    /// Recognizes a reserved address. Matching is exact after trimming.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            START_PAGE => Some(PseudoAddress::StartPage),
            SETTINGS_PAGE => Some(PseudoAddress::Settings),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoAddress::StartPage => START_PAGE,
            PseudoAddress::Settings => SETTINGS_PAGE,
        }
    }

    /// Title shown in the tab strip for the panel.
    pub fn title(&self) -> &'static str {
        match self {
            PseudoAddress::StartPage => "New Tab",
            PseudoAddress::Settings => "Settings",
        }
    }
}

impl fmt::Display for PseudoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The navigation a session is waiting on the engine to finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PendingIntent {
    #[default]
    None,
    Load(String),
    GoBack,
    GoForward,
    Reload,
}

impl PendingIntent {
    pub fn is_none(&self) -> bool {
        matches!(self, PendingIntent::None)
    }
}

/// Per-session generation counter handed to the engine with every intent.
///
/// Engine events echo the token they were produced under; an event whose token
/// differs from the session's current one belongs to a superseded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct NavigationToken(u64);

impl NavigationToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for NavigationToken {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for NavigationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A navigation the engine reported as failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationFailure {
    pub url: String,
    pub reason: String,
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.reason)
    }
}
