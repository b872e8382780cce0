//! Host window tests with the built-in plugins
//!
//! Actions, shortcuts, background tasks and the layout plugin, driven
//! through `HostWindow` the way the binary drives it.

mod common;

use std::path::PathBuf;

use common::*;
use dockyard::config::RuntimeConfig;
use dockyard::container::{pane_state, PaneState, DOCK_PANE};
use dockyard::error::RuntimeError;
use dockyard::host::DockArea;
use dockyard::layout::Preset;
use dockyard::messages::{Msg, PaneMsg};
use dockyard::plugin::{Plugin, PluginContext, PluginDescriptor};
use dockyard::plugins::{
    builtin_descriptors, ids, preset_action_id, BuiltinOptions, Console, Editor, Explorer,
    LayoutPlugin, LOCK_PANES, MAXIMIZE_CURRENT_PANE, SAVE, SAVE_CURRENT_LAYOUT,
};
use dockyard::shortcuts::{parse_key_sequence, ActionRef, Keystroke, Shortcut, ShortcutMap};
use dockyard::HostWindow;
use tempfile::TempDir;

fn builtin_host(options: BuiltinOptions) -> HostWindow {
    let mut host = HostWindow::new(RuntimeConfig::default()).with_shortcuts(ShortcutMap::load(None));
    register_all(&mut host, builtin_descriptors(options));
    host.start().unwrap();
    host
}

fn key(text: &str) -> Keystroke {
    parse_key_sequence(text).unwrap()[0]
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_builtins_start_with_layout_last() {
    let dir = TempDir::new().unwrap();
    let host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    let order = host.plugins.activation_order();
    assert_eq!(order.len(), 9);
    assert_eq!(order.last().map(|id| id.as_str()), Some(ids::LAYOUT));
    assert_eq!(host.plugins.ready_plugins().len(), 9);

    let position = |name: &str| order.iter().position(|id| id == name).unwrap();
    assert!(position(ids::EDITOR) < position(ids::EXPLORER));
    assert!(position(ids::EDITOR) < position(ids::OUTLINE));
}

#[test]
fn test_panes_menu_lists_dockable_plugins() {
    let dir = TempDir::new().unwrap();
    let host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    let layout = host.plugins.widget::<LayoutPlugin>(&id(ids::LAYOUT)).unwrap();
    assert_eq!(layout.panes().len(), 8);
    assert!(!layout.panes().contains(&id(ids::LAYOUT)));
    assert!(!host.frame.has_dock_widget(&id(ids::LAYOUT)));
}

#[test]
fn test_editor_sees_console() {
    let dir = TempDir::new().unwrap();
    let host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    let editor = host.plugins.widget::<Editor>(&id(ids::EDITOR)).unwrap();
    assert!(editor.is_console_available());
}

#[test]
fn test_shortcut_text_applied_to_actions() {
    let dir = TempDir::new().unwrap();
    let host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    let save = host.ui.actions.get(SAVE, ids::EDITOR, "_").unwrap();
    assert!(save.shortcut().is_some());
}

// ============================================================================
// Background tasks
// ============================================================================

#[test]
fn test_explorer_lists_root_on_worker() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.py"), "").unwrap();
    std::fs::write(dir.path().join("a.py"), "").unwrap();

    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });
    host.finish_tasks();

    let explorer = host.plugins.widget::<Explorer>(&id(ids::EXPLORER)).unwrap();
    assert!(!explorer.is_loading());
    assert_eq!(
        explorer.entries(),
        &[dir.path().join("a.py"), dir.path().join("b.py")]
    );
}

#[test]
fn test_editor_save_runs_on_worker() {
    let root = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let path: PathBuf = work.path().join("script.py");

    let mut host = builtin_host(BuiltinOptions {
        files: vec![path.clone()],
        explorer_root: Some(root.path().to_path_buf()),
    });

    {
        let editor = host.plugins.widget_mut::<Editor>(&id(ids::EDITOR)).unwrap();
        let file = editor.current_mut().unwrap();
        file.text = "print('hi')\n".to_string();
        file.modified = true;
    }
    assert!(!host.shutdown(false));

    host.trigger_action(SAVE, ids::EDITOR, "_").unwrap();
    assert!(host.plugins.widget::<Editor>(&id(ids::EDITOR)).unwrap().is_saving());

    host.finish_tasks();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "print('hi')\n");
    let editor = host.plugins.widget::<Editor>(&id(ids::EDITOR)).unwrap();
    assert!(!editor.is_saving());
    assert!(!editor.current().unwrap().modified);
    assert!(host.frame.status().unwrap().text.starts_with("Saved"));
    assert!(host.shutdown(false));
}

// ============================================================================
// Layout plugin actions
// ============================================================================

#[test]
fn test_maximize_current_pane_action() {
    let dir = TempDir::new().unwrap();
    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    host.trigger_action(MAXIMIZE_CURRENT_PANE, ids::LAYOUT, "_").unwrap();
    assert_eq!(host.layout.maximized(), None);
    assert_eq!(host.frame.status().unwrap().text, "No pane has focus");

    host.dispatch(Msg::Pane(PaneMsg::FocusIn(id(ids::EDITOR))));
    host.trigger_action(MAXIMIZE_CURRENT_PANE, ids::LAYOUT, "_").unwrap();
    assert_eq!(host.layout.maximized(), Some(&id(ids::EDITOR)));
    assert_eq!(host.plugins.maximized_count(), 1);

    host.trigger_action(MAXIMIZE_CURRENT_PANE, ids::LAYOUT, "_").unwrap();
    assert_eq!(host.layout.maximized(), None);
    assert_eq!(host.plugins.maximized_count(), 0);
}

#[test]
fn test_lock_panes_action() {
    let dir = TempDir::new().unwrap();
    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });
    assert!(host.layout.is_locked());

    host.trigger_action(LOCK_PANES, ids::LAYOUT, "_").unwrap();
    assert!(!host.layout.is_locked());
    assert!(!host
        .plugins
        .get_plugin(&id(ids::HELP))
        .unwrap()
        .is_title_bar_locked());
}

#[test]
fn test_preset_and_save_layout_actions() {
    let dir = TempDir::new().unwrap();
    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    host.trigger_action(&preset_action_id(Preset::Matlab), ids::LAYOUT, "_")
        .unwrap();
    assert_eq!(host.frame.placement(&id(ids::CONSOLE)).unwrap().area, DockArea::Bottom);

    host.trigger_action(SAVE_CURRENT_LAYOUT, ids::LAYOUT, "_").unwrap();
    assert_eq!(host.layout.custom_names(), vec!["Custom layout 1"]);
}

// ============================================================================
// Shortcuts
// ============================================================================

#[test]
fn test_shortcut_toggles_pane() {
    let dir = TempDir::new().unwrap();
    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });
    assert_eq!(pane_state(&host.frame, &id(ids::HELP)), PaneState::DockedVisible);

    host.handle_key(key("ctrl+shift+h"));
    assert_eq!(pane_state(&host.frame, &id(ids::HELP)), PaneState::Hidden);

    host.handle_key(key("ctrl+shift+h"));
    assert_eq!(pane_state(&host.frame, &id(ids::HELP)), PaneState::DockedVisible);
}

#[test]
fn test_chord_restores_default_layout() {
    let dir = TempDir::new().unwrap();
    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });
    host.trigger_action(&preset_action_id(Preset::Matlab), ids::LAYOUT, "_")
        .unwrap();

    assert_eq!(host.handle_key(key("ctrl+k")), None);
    host.handle_key(key("ctrl+d"));
    assert_eq!(host.frame.placement(&id(ids::EDITOR)).unwrap().area, DockArea::Left);
}

#[test]
fn test_console_clear_shortcut() {
    let dir = TempDir::new().unwrap();
    let mut host = builtin_host(BuiltinOptions {
        explorer_root: Some(dir.path().to_path_buf()),
        ..BuiltinOptions::default()
    });

    // Disabled while the console is empty
    assert_eq!(host.handle_key(key("ctrl+l")), None);

    host.plugins
        .widget_mut::<Console>(&id(ids::CONSOLE))
        .unwrap()
        .write_line("In [1]: 1 + 1");
    host.sync_panes();

    host.handle_key(key("ctrl+l"));
    let console = host.plugins.widget::<Console>(&id(ids::CONSOLE)).unwrap();
    assert!(console.lines().is_empty());
}

#[test]
fn test_focused_plugin_binding_wins() {
    let journal = journal();
    let shared = key("ctrl+e");
    let shortcuts = ShortcutMap::with_shortcuts(vec![
        Shortcut::new(shared, ActionRef::new("first", "_", "go")),
        Shortcut::new(shared, ActionRef::new("second", "_", "go")),
    ]);
    let mut host = HostWindow::new(RuntimeConfig::default()).with_shortcuts(shortcuts);
    register_all(
        &mut host,
        vec![
            Actor::descriptor("first", &journal),
            Actor::descriptor("second", &journal),
        ],
    );
    host.start().unwrap();

    host.handle_key(shared);
    host.dispatch(Msg::Pane(PaneMsg::FocusIn(id("second"))));
    host.handle_key(shared);

    assert_eq!(*journal.borrow(), vec!["first go", "second go"]);
}

// ============================================================================
// Dispatch edge cases
// ============================================================================

#[test]
fn test_disabled_action_yields_nothing() {
    let journal = journal();
    let mut host = test_host();
    register_all(&mut host, vec![Quiet::descriptor("help", &journal)]);
    host.start().unwrap();

    // Docked panes cannot be docked again
    assert_eq!(host.trigger_action(DOCK_PANE, "help", "main_widget").unwrap(), None);
}

#[test]
fn test_unknown_action_is_not_found() {
    let mut host = test_host();
    host.start().unwrap();

    let err = host.trigger_action("nothing", "help", "_").unwrap_err();
    assert!(matches!(err, RuntimeError::NotFound { kind: "action", .. }));
}

#[test]
fn test_plugin_action_reaches_on_action() {
    let journal = journal();
    let mut host = test_host();
    register_all(&mut host, vec![Quiet::descriptor("a", &journal)]);
    host.start().unwrap();

    host.dispatch(Msg::plugin_action("a", "refresh"));
    assert_eq!(*journal.borrow(), vec!["a action refresh false"]);
}

#[test]
fn test_self_posting_plugin_is_cut_off() {
    let journal = journal();
    let mut host = test_host();
    register_all(&mut host, vec![Echo::descriptor("echo", &journal)]);
    host.start().unwrap();

    host.dispatch(Msg::plugin_action("echo", "again"));

    let rounds = journal.borrow().len();
    assert!(rounds > 1);
    assert!(rounds <= 33, "{} rounds", rounds);
}

#[test]
fn test_status_messages_use_configured_timeout() {
    let dir = TempDir::new().unwrap();
    let config = RuntimeConfig {
        status_timeout_ms: 1234,
        ..RuntimeConfig::default()
    };
    let mut host = HostWindow::new(config);
    register_all(
        &mut host,
        builtin_descriptors(BuiltinOptions {
            explorer_root: Some(dir.path().to_path_buf()),
            ..BuiltinOptions::default()
        }),
    );
    host.start().unwrap();

    host.trigger_action(MAXIMIZE_CURRENT_PANE, ids::LAYOUT, "_").unwrap();
    let status = host.frame.status().unwrap();
    assert_eq!(status.text, "No pane has focus");
    assert_eq!(status.timeout_ms, 1234);
}

#[test]
fn test_callback_finds_own_container() {
    let journal = journal();
    let mut host = test_host();
    register_all(&mut host, vec![Mirror::descriptor("mirror", &journal)]);
    host.start().unwrap();

    host.trigger_action("go", "mirror", "_").unwrap();
    assert_eq!(*journal.borrow(), vec!["Mirror: own title Mirror"]);
    assert_eq!(host.frame.status().unwrap().text, "Mirror");
}

// ============================================================================
// Helpers
// ============================================================================

/// Creates a global "go" action and journals it
struct Actor {
    name: String,
    journal: Journal,
}

impl Actor {
    fn descriptor(plugin: &str, journal: &Journal) -> PluginDescriptor {
        let journal = journal.clone();
        let name = plugin.to_string();
        PluginDescriptor::new(plugin, move || {
            Ok(Actor {
                name: name.clone(),
                journal: journal.clone(),
            })
        })
    }
}

impl Plugin for Actor {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn setup(&mut self, pane: &mut dockyard::plugin::PaneSetup<'_>) -> anyhow::Result<()> {
        pane.create_action("go", "Go", "_");
        Ok(())
    }

    fn on_action(&mut self, action: &str, _checked: bool, _cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.journal.borrow_mut().push(format!("{} {}", self.name, action));
        Ok(())
    }
}

/// Posts its own action again every time it runs
struct Echo {
    journal: Journal,
}

impl Echo {
    fn descriptor(plugin: &str, journal: &Journal) -> PluginDescriptor {
        let journal = journal.clone();
        PluginDescriptor::new(plugin, move || {
            Ok(Echo {
                journal: journal.clone(),
            })
        })
    }
}

impl Plugin for Echo {
    fn title(&self) -> String {
        "Echo".to_string()
    }

    fn on_action(&mut self, action: &str, _checked: bool, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.journal.borrow_mut().push(action.to_string());
        let me = cx.plugin_id().clone();
        cx.post(Msg::plugin_action(me, action));
        Ok(())
    }
}

/// Looks up its own container from inside an action callback
struct Mirror {
    journal: Journal,
}

impl Mirror {
    fn descriptor(plugin: &str, journal: &Journal) -> PluginDescriptor {
        let journal = journal.clone();
        PluginDescriptor::new(plugin, move || {
            Ok(Mirror {
                journal: journal.clone(),
            })
        })
    }
}

impl Plugin for Mirror {
    fn title(&self) -> String {
        "Mirror".to_string()
    }

    fn setup(&mut self, pane: &mut dockyard::plugin::PaneSetup<'_>) -> anyhow::Result<()> {
        pane.create_action("go", "Go", "_");
        Ok(())
    }

    fn on_action(&mut self, _action: &str, _checked: bool, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        let me = cx.plugin_id().clone();
        let title = cx.get_plugin(&me)?.title().to_string();
        self.journal
            .borrow_mut()
            .push(format!("{}: own title {}", self.title(), title));
        cx.show_status_message(title);
        Ok(())
    }
}
