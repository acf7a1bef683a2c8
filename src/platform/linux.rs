// GitBrowser platform paths for Linux
// Data: ~/.local/share/gitbrowser

use std::env;
use std::path::PathBuf;

/// Returns the data directory for GitBrowser on Linux.
/// Uses `$XDG_DATA_HOME/gitbrowser` if set, otherwise `~/.local/share/gitbrowser`.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var("XDG_DATA_HOME").ok(), env::var("HOME").ok())
}

fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    match xdg_data_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg).join("gitbrowser"),
        None => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(".local")
            .join("share")
            .join("gitbrowser"),
    }
}
