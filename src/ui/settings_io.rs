use std::fs;
use std::path::PathBuf;

use log::warn;

use crate::ui::settings::UiSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("fateweaver");
    fs::create_dir_all(&path).ok();
    path.push("settings.json");
    path
}

pub fn load_settings() -> UiSettings {
    let path = settings_path();
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("ignoring malformed {}: {err}", path.display());
            UiSettings::default()
        }),
        Err(_) => UiSettings::default(),
    }
}

pub fn save_settings(settings: &UiSettings) {
    let path = settings_path();
    if let Ok(json) = serde_json::to_string_pretty(settings) {
        if let Err(err) = fs::write(&path, json) {
            warn!("could not write {}: {err}", path.display());
        }
    }
}
