// GitBrowser platform paths for Windows
// Data: %APPDATA%\GitBrowser, falling back to %USERPROFILE%\AppData\Roaming

use std::env;
use std::path::PathBuf;

pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var("APPDATA").ok(), env::var("USERPROFILE").ok())
}

fn data_dir_from(appdata: Option<String>, profile: Option<String>) -> PathBuf {
    let roaming = match (appdata.filter(|v| !v.is_empty()), profile) {
        (Some(appdata), _) => PathBuf::from(appdata),
        (None, Some(profile)) => PathBuf::from(profile).join("AppData").join("Roaming"),
        (None, None) => PathBuf::from("C:\\Users\\Default\\AppData\\Roaming"),
    };
    roaming.join("GitBrowser")
}
