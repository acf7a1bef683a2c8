use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::navigation::PendingIntent;

/// Process-unique, immutable identifier of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tab's state as handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabSnapshot {
    pub id: TabId,
    pub address: String,
    pub title: Option<String>,
    pub pending_intent: PendingIntent,
    pub load_progress: f64,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub last_error: Option<String>,
}

/// Every tab in display order plus the selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrySnapshot {
    pub tabs: Vec<TabSnapshot>,
    pub selected_tab_id: TabId,
}
