// User preferences persisted as TOML
// Board geometry is fixed at build time (see xtm_board); only display options live here

use directories::ProjectDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "xtmines";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub show_indicator: bool, // Draw a marker next to the cursor cell
    pub ascii_icons: bool,    // ASCII glyphs for terminals without good Unicode fonts
    pub language: String,     // "en" or "zh"
}

impl Default for Config {
    fn default() -> Self {
        Config {
            show_indicator: false,
            ascii_icons: false,
            language: system_language(),
        }
    }
}

/// "zh" for Chinese system locales, "en" for everything else
pub fn system_language() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    if locale.to_lowercase().starts_with("zh") {
        "zh".to_string()
    } else {
        "en".to_string()
    }
}

/// Platform config directory (e.g. ~/.config/xtmines/xtmines.toml on Linux),
/// current directory when the platform has none
pub fn config_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "xhbl", APP_NAME) {
        return Some(proj.config_dir().join(format!("{}.toml", APP_NAME)));
    }
    env::current_dir()
        .ok()
        .map(|dir| dir.join(format!("{}.toml", APP_NAME)))
}

/// Read a config file; None when it is missing or does not parse
pub fn load_config(path: &Path) -> Option<Config> {
    let text = fs::read_to_string(path).ok()?;
    match toml::from_str::<Config>(&text) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!("Ignoring unreadable config {}: {}", path.display(), e);
            None
        }
    }
}

/// Write a config file, creating its directory on the way
pub fn write_config(path: &Path, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let text = toml::to_string(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

/// Load preferences from disk, writing defaults on first run
pub fn load_or_create_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if let Some(cfg) = load_config(&path) {
        info!("Loaded config from {}", path.display());
        return cfg;
    }
    let cfg = Config::default();
    if let Err(e) = write_config(&path, &cfg) {
        error!("Could not create config {}: {}", path.display(), e);
    }
    cfg
}

/// Persist preferences; failures are logged and otherwise ignored
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        if let Err(e) = write_config(&path, cfg) {
            error!("Could not save config {}: {}", path.display(), e);
        }
    }
}
