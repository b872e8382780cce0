//! YAML shortcut files
//!
//! ```yaml
//! shortcuts:
//!   - key: ctrl+s
//!     plugin: editor
//!     context: toolbar
//!     action: save
//!   - key: ctrl+k ctrl+m      # chord
//!     action: maximize_current_pane
//!   - key: ctrl+q
//!     action: unbound          # drop the inherited binding
//! ```
//!
//! `plugin` defaults to `main` and `context` to `_` (global).

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::binding::{ActionRef, Shortcut};
use super::types::Keystroke;

/// Action name that removes a binding
pub const UNBOUND: &str = "unbound";

#[derive(Debug, Clone, Error)]
pub enum ShortcutError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Deserialize)]
struct ShortcutsFile {
    #[serde(default)]
    shortcuts: Vec<ShortcutEntry>,
}

#[derive(Debug, Deserialize)]
struct ShortcutEntry {
    key: String,
    #[serde(default = "default_plugin")]
    plugin: String,
    #[serde(default = "default_context")]
    context: String,
    action: String,
    /// `macos`, `windows` or `linux`; absent means every platform
    #[serde(default)]
    platform: Option<String>,
}

fn default_plugin() -> String {
    "main".to_string()
}

fn default_context() -> String {
    "_".to_string()
}

pub fn load_shortcuts_file(path: &Path) -> Result<Vec<Shortcut>, ShortcutError> {
    let content = std::fs::read_to_string(path).map_err(|e| ShortcutError::Io(e.to_string()))?;
    parse_shortcuts_yaml(&content)
}

pub fn parse_shortcuts_yaml(yaml: &str) -> Result<Vec<Shortcut>, ShortcutError> {
    let file: ShortcutsFile =
        serde_yaml::from_str(yaml).map_err(|e| ShortcutError::Parse(e.to_string()))?;

    let platform = current_platform();
    let mut shortcuts = Vec::with_capacity(file.shortcuts.len());
    for entry in file.shortcuts {
        if entry.platform.as_deref().is_some_and(|p| p != platform) {
            continue;
        }

        let keystrokes = parse_key_sequence(&entry.key)?;
        let shortcut = if entry.action.eq_ignore_ascii_case(UNBOUND) {
            Shortcut::unbound(keystrokes)
        } else {
            Shortcut::chord(
                keystrokes,
                ActionRef::new(entry.plugin.as_str(), entry.context.as_str(), entry.action),
            )
        };
        shortcuts.push(shortcut);
    }
    Ok(shortcuts)
}

/// Parse a space-separated keystroke sequence
pub fn parse_key_sequence(keys: &str) -> Result<Vec<Keystroke>, ShortcutError> {
    let strokes = keys
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<Vec<Keystroke>, _>>()?;
    if strokes.is_empty() {
        return Err(ShortcutError::InvalidKey(format!("empty key '{}'", keys)));
    }
    Ok(strokes)
}

fn current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Context, Owner};

    #[test]
    fn test_defaults_for_plugin_and_context() {
        let shortcuts = parse_shortcuts_yaml(
            r#"
shortcuts:
  - key: ctrl+shift+m
    action: toggle_maximize
"#,
        )
        .unwrap();
        let target = shortcuts[0].target.as_ref().unwrap();
        assert_eq!(target.plugin, Owner::Main);
        assert_eq!(target.context, Context::Global);
        assert_eq!(target.action, "toggle_maximize");
    }

    #[test]
    fn test_chord_and_unbound() {
        let shortcuts = parse_shortcuts_yaml(
            r#"
shortcuts:
  - key: ctrl+k ctrl+s
    plugin: editor
    context: toolbar
    action: save
  - key: ctrl+q
    action: unbound
"#,
        )
        .unwrap();
        assert!(shortcuts[0].is_chord());
        assert_eq!(shortcuts[0].target.as_ref().unwrap().plugin, Owner::from("editor"));
        assert_eq!(shortcuts[1].target, None);
    }

    #[test]
    fn test_other_platform_skipped() {
        let other = if cfg!(target_os = "windows") { "linux" } else { "windows" };
        let yaml = format!(
            "shortcuts:\n  - key: f1\n    action: help\n    platform: {}\n",
            other
        );
        assert!(parse_shortcuts_yaml(&yaml).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_key_is_error() {
        let err = parse_shortcuts_yaml("shortcuts:\n  - key: ctrl+nope\n    action: x\n").unwrap_err();
        assert!(matches!(err, ShortcutError::InvalidKey(_)));
    }
}
