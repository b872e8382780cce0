//! Where dockyard keeps its files
//!
//! ```text
//! <config dir>/
//! ├── config.yaml      RuntimeConfig
//! ├── shortcuts.yaml   user shortcuts, merged over the built-in ones
//! ├── layout.json      current and custom layouts
//! └── logs/            dockyard.log.YYYY-MM-DD
//! ```
//!
//! `<config dir>` is `$XDG_CONFIG_HOME/dockyard`, else `~/.config/dockyard`;
//! on Windows it is `%APPDATA%\dockyard`.

use std::path::PathBuf;

const APP_DIR: &str = "dockyard";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_NAME: &str = "dockyard.log";

/// Base config directory, if a home directory can be found
pub fn config_dir() -> Option<PathBuf> {
    base_dir().map(|base| base.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn base_dir() -> Option<PathBuf> {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

#[cfg(not(target_os = "windows"))]
fn base_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

fn in_config_dir(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(name))
}

pub fn config_file() -> Option<PathBuf> {
    in_config_dir("config.yaml")
}

pub fn shortcuts_file() -> Option<PathBuf> {
    in_config_dir("shortcuts.yaml")
}

pub fn layout_file() -> Option<PathBuf> {
    in_config_dir("layout.json")
}

pub fn logs_dir() -> Option<PathBuf> {
    in_config_dir("logs")
}

/// Create the logs directory if needed, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    std::fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
