// GitBrowser platform paths for macOS
// Data: ~/Library/Application Support/GitBrowser

use std::env;
use std::path::PathBuf;

pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var("HOME").ok())
}

fn data_dir_from(home: Option<String>) -> PathBuf {
    let home = home.filter(|h| !h.is_empty()).unwrap_or_else(|| String::from("/tmp"));
    PathBuf::from(home)
        .join("Library")
        .join("Application Support")
        .join("GitBrowser")
}
