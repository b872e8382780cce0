//! Configuration system tests
//!
//! Tests for config paths, runtime config, and shortcut loading/merging.

use dockyard::actions::{Context, Owner};
use dockyard::config::RuntimeConfig;
use dockyard::config_paths;
use dockyard::plugin::PluginId;
use dockyard::shortcuts::{
    merge_shortcuts, parse_key_sequence, parse_shortcuts_yaml, ActionRef, KeyAction, KeyCode,
    Keystroke, Modifiers, Shortcut, ShortcutMap,
};
use tempfile::TempDir;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("dockyard"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_shortcuts_and_layout_live_in_config_dir() {
    let (Some(config), Some(shortcuts), Some(layout)) = (
        config_paths::config_dir(),
        config_paths::shortcuts_file(),
        config_paths::layout_file(),
    ) else {
        return;
    };
    assert!(shortcuts.starts_with(&config));
    assert!(layout.starts_with(&config));
    assert!(layout.to_string_lossy().ends_with("layout.json"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Runtime Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = RuntimeConfig::default();
    assert!(config.lock_panes);
    assert!(config.restore_layout);
    assert!(config.show_empty_state);
    assert_eq!(config.default_layout, "default");
    assert!(config.disabled_plugins.is_empty());
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = RuntimeConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, RuntimeConfig::default());
}

#[test]
fn test_config_serialize_deserialize() {
    let mut config = RuntimeConfig::default();
    config.restore_layout = false;
    config.disabled_plugins.insert(PluginId::from("history"));

    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: RuntimeConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_save_to_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("config.yaml");

    RuntimeConfig::default().save_to(&path).unwrap();
    assert!(path.exists());
}

// ========================================================================
// Shortcut Helpers
// ========================================================================

fn ctrl(c: char) -> Keystroke {
    Keystroke::char_with_mods(c, Modifiers::CTRL)
}

fn target(plugin: &str, action: &str) -> ActionRef {
    ActionRef::new(plugin, "_", action)
}

// ========================================================================
// Shortcut Loading Tests
// ========================================================================

#[test]
fn test_default_shortcuts_not_empty() {
    let map = ShortcutMap::load(None);
    assert!(!map.is_empty());
}

#[test]
fn test_default_shortcuts_cover_layout_actions() {
    let map = ShortcutMap::load(None);
    for action in ["maximize_current_pane", "lock_panes", "default_layout"] {
        assert!(
            map.shortcuts()
                .iter()
                .filter_map(|s| s.target.as_ref())
                .any(|t| t.plugin == Owner::from("layout") && t.action == action),
            "no shortcut for {}",
            action
        );
    }
}

#[test]
fn test_parse_key_sequence() {
    let keys = parse_key_sequence("ctrl+k ctrl+d").unwrap();
    assert_eq!(keys, vec![ctrl('k'), ctrl('d')]);

    let shifted = parse_key_sequence("ctrl+shift+h").unwrap();
    assert_eq!(shifted[0].mods, Modifiers::CTRL | Modifiers::SHIFT);
    assert_eq!(shifted[0].key, KeyCode::Char('h'));

    assert!(parse_key_sequence("").is_err());
    assert!(parse_key_sequence("ctrl+").is_err());
}

#[test]
fn test_named_context_in_file() {
    let shortcuts = parse_shortcuts_yaml(
        r#"
shortcuts:
  - key: ctrl+shift+p
    plugin: plots
    context: main_widget
    action: switch to plots
"#,
    )
    .unwrap();
    let target = shortcuts[0].target.as_ref().unwrap();
    assert_eq!(target.plugin, Owner::from("plots"));
    assert_eq!(target.context, Context::named("main_widget"));
}

#[test]
fn test_malformed_file_is_an_error() {
    assert!(parse_shortcuts_yaml("shortcuts: [ {key: ctrl+x").is_err());
    assert!(parse_shortcuts_yaml("shortcuts:\n  - key: ctrl+nothing\n    action: x\n").is_err());
}

// ========================================================================
// Shortcut Merge Tests
// ========================================================================

#[test]
fn test_merge_empty_user_returns_base() {
    let base = vec![Shortcut::new(ctrl('s'), target("editor", "save"))];
    let merged = merge_shortcuts(base.clone(), vec![]);
    assert_eq!(merged, base);
}

#[test]
fn test_merge_adds_and_overrides() {
    let base = vec![Shortcut::new(ctrl('s'), target("editor", "save"))];
    let user = vec![
        Shortcut::new(ctrl('s'), target("editor", "save_all")),
        Shortcut::new(ctrl('z'), target("editor", "undo")),
    ];

    let merged = merge_shortcuts(base, user);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].target.as_ref().unwrap().action, "save_all");
    assert_eq!(merged[1].target.as_ref().unwrap().action, "undo");
}

#[test]
fn test_merge_unbound_removes_binding() {
    let base = vec![
        Shortcut::new(ctrl('s'), target("editor", "save")),
        Shortcut::new(ctrl('l'), target("ipython_console", "clear_console")),
    ];
    let user = vec![
        Shortcut::unbound(vec![ctrl('l')]),
        Shortcut::unbound(vec![ctrl('q')]),
    ];

    let merged = merge_shortcuts(base, user);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].keystrokes, vec![ctrl('s')]);
}

#[test]
fn test_user_file_layers_over_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shortcuts.yaml");
    std::fs::write(
        &path,
        r#"
shortcuts:
  - key: ctrl+l
    action: unbound
  - key: ctrl+alt+p
    plugin: layout
    action: lock_panes
"#,
    )
    .unwrap();

    let defaults = ShortcutMap::load(None);
    let mut map = ShortcutMap::load(Some(&path));
    assert_eq!(map.len(), defaults.len());

    assert_eq!(map.handle_keystroke(ctrl('l'), None), KeyAction::NoMatch);
    let lock = Keystroke::char_with_mods('p', Modifiers::CTRL | Modifiers::ALT);
    assert_eq!(
        map.handle_keystroke(lock, None),
        KeyAction::Trigger(target("layout", "lock_panes"))
    );
}

#[test]
fn test_broken_user_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shortcuts.yaml");
    std::fs::write(&path, "shortcuts: {").unwrap();

    let map = ShortcutMap::load(Some(&path));
    assert_eq!(map.len(), ShortcutMap::load(None).len());
}
