// GitBrowser platform abstraction
// Resolves where the core keeps its SQLite store on Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// File name of the settings and bookmarks database inside the data directory.
pub const DATABASE_FILE: &str = "gitbrowser-core.db";

/// Where the core keeps its database.
///
/// - **Linux**: `~/.local/share/gitbrowser` (or `$XDG_DATA_HOME/gitbrowser`)
/// - **macOS**: `~/Library/Application Support/GitBrowser`
/// - **Windows**: `%APPDATA%/GitBrowser`
/// - anything else: `./gitbrowser`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("gitbrowser")
    }
}

/// Default location of the persistent store.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}
