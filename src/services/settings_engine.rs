// GitBrowser Settings Engine
// Reads and writes user settings through the persistent key-value store.
// Every leaf of `BrowserSettings` lives under its own dot-notation key
// (`search.engine`, `privacy.private_mode`, ...) as a JSON-encoded value.

use serde_json::Value;
use tracing::warn;

use crate::store::{keys, PersistentStore};
use crate::types::errors::SettingsError;
use crate::types::settings::{
    BrowserSettings, NewTabPage, NewWindowPolicy, PrivacySettings, SearchConfig, SearchEngine, ThemeMode,
};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    /// Takes a snapshot of all settings. Missing or unreadable keys fall back to defaults.
    fn load(&self) -> BrowserSettings;
    fn get_value(&self, key: &str) -> Result<Value, SettingsError>;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    /// Removes every stored setting so the defaults apply again.
    fn reset(&mut self) -> Result<(), SettingsError>;
}

/// Settings engine over a borrowed persistent store.
pub struct SettingsEngine<'a> {
    store: &'a dyn PersistentStore,
}

impl<'a> SettingsEngine<'a> {
    pub fn new(store: &'a dyn PersistentStore) -> Self {
        Self { store }
    }

    /// Every settable dot-notation key, sorted.
    pub fn keys() -> Vec<String> {
        let mut out = Vec::new();
        if let Ok(defaults) = serde_json::to_value(BrowserSettings::default()) {
            collect_leaf_keys(&defaults, "", &mut out);
        }
        out
    }

    pub fn search_config(&self) -> SearchConfig {
        self.load().search
    }

    pub fn privacy(&self) -> PrivacySettings {
        self.load().privacy
    }

    pub fn set_search_engine(&mut self, engine: SearchEngine) -> Result<(), SettingsError> {
        self.set_typed(keys::SEARCH_ENGINE, &engine)
    }

    /// Stores a custom template and switches the engine to it.
    pub fn set_custom_search_template(&mut self, template: &str) -> Result<(), SettingsError> {
        self.set_typed(keys::SEARCH_CUSTOM_TEMPLATE, &Some(template.trim()))?;
        self.set_search_engine(SearchEngine::Custom)
    }

    pub fn set_private_mode(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set_typed(keys::PRIVATE_MODE, &enabled)
    }

    pub fn set_homepage(&mut self, homepage: &str) -> Result<(), SettingsError> {
        self.set_typed(keys::HOMEPAGE, &homepage.trim())
    }

    pub fn set_new_tab_page(&mut self, page: NewTabPage) -> Result<(), SettingsError> {
        self.set_typed(keys::NEW_TAB_PAGE, &page)
    }

    pub fn set_new_window_policy(&mut self, policy: NewWindowPolicy) -> Result<(), SettingsError> {
        self.set_typed(keys::NEW_WINDOW_POLICY, &policy)
    }

    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<(), SettingsError> {
        self.set_typed(keys::THEME, &theme)
    }

    fn set_typed<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        self.set_value(key, value)
    }

    /// Reads one stored value. `Ok(None)` when absent or not valid JSON.
    fn read_stored(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(key = %key, error = %e, "ignoring malformed stored setting");
                Ok(None)
            }
        }
    }
}

impl<'a> SettingsEngineTrait for SettingsEngine<'a> {
    /// Overlays each stored key onto the defaults, one at a time.
    ///
    /// A value that does not fit its field (wrong type, unknown variant) is skipped
    /// so one bad key cannot take the other settings down with it.
    fn load(&self) -> BrowserSettings {
        let defaults = BrowserSettings::default();
        let Ok(mut tree) = serde_json::to_value(&defaults) else {
            return defaults;
        };

        for key in Self::keys() {
            let stored = match self.read_stored(&key) {
                Ok(Some(v)) => v,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %key, error = %e, "settings store unavailable, using default");
                    continue;
                }
            };

            let mut candidate = tree.clone();
            if set_path(&mut candidate, &key, stored).is_err() {
                continue;
            }
            if serde_json::from_value::<BrowserSettings>(candidate.clone()).is_ok() {
                tree = candidate;
            } else {
                warn!(key = %key, "ignoring stored setting with invalid value");
            }
        }

        serde_json::from_value(tree).unwrap_or(defaults)
    }

    fn get_value(&self, key: &str) -> Result<Value, SettingsError> {
        let tree = serde_json::to_value(self.load())
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        let mut current = &tree;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;
        }
        if current.is_object() {
            return Err(SettingsError::InvalidKey(key.to_string()));
        }
        Ok(current.clone())
    }

    /// Validates `value` against the settings schema, then persists it.
    ///
    /// # Examples
    /// - `"search.engine"` with `"Google"`
    /// - `"privacy.private_mode"` with `true`
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        if !Self::keys().iter().any(|k| k == key) {
            return Err(SettingsError::InvalidKey(format!(
                "Key '{}' not found in settings",
                key
            )));
        }

        let mut tree = serde_json::to_value(BrowserSettings::default())
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        set_path(&mut tree, key, value.clone())?;
        serde_json::from_value::<BrowserSettings>(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.store.set(key, &value.to_string())?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        for key in Self::keys() {
            self.store.remove(&key)?;
        }
        Ok(())
    }
}

fn collect_leaf_keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                collect_leaf_keys(v, &path, out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}

/// Replaces the value at a dot-notation path inside `tree`.
fn set_path(tree: &mut Value, key: &str, value: Value) -> Result<(), SettingsError> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = tree;
    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            // Last part: set the value
            return match current {
                Value::Object(map) if map.contains_key(*part) => {
                    map.insert(part.to_string(), value);
                    Ok(())
                }
                _ => Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                ))),
            };
        }
        current = match current.get_mut(*part) {
            Some(v) => v,
            None => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
        };
    }
    Ok(())
}
