//! Keystroke lookup and resolution through the action registry

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use super::binding::{ActionRef, Shortcut};
use super::config::{load_shortcuts_file, parse_shortcuts_yaml};
use super::types::Keystroke;
use crate::actions::{Action, Context, Owner, UiRegistry};
use crate::error::Result;
use crate::plugin::PluginId;

/// Shortcuts shipped with the binary
const DEFAULT_SHORTCUTS_YAML: &str = include_str!("../../shortcuts.yaml");

/// Outcome of feeding one keystroke to the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Trigger(ActionRef),
    /// Keystroke is the start of a chord
    AwaitMore,
    NoMatch,
}

#[derive(Debug, Clone, Default)]
pub struct ShortcutMap {
    shortcuts: Vec<Shortcut>,
    /// Indices of single-keystroke shortcuts
    single: HashMap<Keystroke, Vec<usize>>,
    /// Indices of chords by first keystroke
    chords: HashMap<Keystroke, Vec<usize>>,
    pending: Vec<Keystroke>,
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shortcuts(shortcuts: Vec<Shortcut>) -> Self {
        let mut map = Self::new();
        for shortcut in shortcuts {
            map.add(shortcut);
        }
        map
    }

    /// Embedded defaults merged with `user_file`, if it exists
    pub fn load(user_file: Option<&Path>) -> Self {
        let mut shortcuts = match parse_shortcuts_yaml(DEFAULT_SHORTCUTS_YAML) {
            Ok(shortcuts) => shortcuts,
            Err(e) => {
                tracing::warn!("Failed to parse embedded shortcuts: {}", e);
                Vec::new()
            }
        };

        if let Some(path) = user_file.filter(|p| p.exists()) {
            match load_shortcuts_file(path) {
                Ok(user) => {
                    tracing::info!("Loaded {} shortcuts from {}", user.len(), path.display());
                    shortcuts = merge_shortcuts(shortcuts, user);
                }
                Err(e) => tracing::warn!("Ignoring shortcuts at {}: {}", path.display(), e),
            }
        }

        Self::with_shortcuts(shortcuts)
    }

    pub fn add(&mut self, shortcut: Shortcut) {
        let Some(first) = shortcut.keystrokes.first().copied() else {
            return;
        };
        if shortcut.target.is_none() {
            return;
        }
        let idx = self.shortcuts.len();
        let index = if shortcut.is_chord() {
            &mut self.chords
        } else {
            &mut self.single
        };
        index.entry(first).or_default().push(idx);
        self.shortcuts.push(shortcut);
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Drop a half-typed chord
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Feed one keystroke
    ///
    /// When several shortcuts share the keys, the one owned by the focused
    /// plugin wins, then the first registered.
    pub fn handle_keystroke(&mut self, keystroke: Keystroke, focus: Option<&PluginId>) -> KeyAction {
        if !self.pending.is_empty() {
            self.pending.push(keystroke);
            return self.complete_chord(focus);
        }

        if let Some(target) = self
            .single
            .get(&keystroke)
            .and_then(|indices| self.pick(indices, 1, focus))
        {
            return KeyAction::Trigger(target);
        }

        if self.chords.contains_key(&keystroke) {
            self.pending.push(keystroke);
            return KeyAction::AwaitMore;
        }
        KeyAction::NoMatch
    }

    fn complete_chord(&mut self, focus: Option<&PluginId>) -> KeyAction {
        let Some(indices) = self.chords.get(&self.pending[0]) else {
            self.reset();
            return KeyAction::NoMatch;
        };

        let exact: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| self.shortcuts[i].keystrokes == self.pending)
            .collect();
        if let Some(target) = self.pick(&exact, self.pending.len(), focus) {
            self.reset();
            return KeyAction::Trigger(target);
        }

        let len = self.pending.len();
        let could_match = indices.iter().any(|&i| {
            let keys = &self.shortcuts[i].keystrokes;
            keys.len() > len && keys[..len] == self.pending[..]
        });
        if could_match {
            KeyAction::AwaitMore
        } else {
            self.reset();
            KeyAction::NoMatch
        }
    }

    fn pick(&self, indices: &[usize], len: usize, focus: Option<&PluginId>) -> Option<ActionRef> {
        let candidates = || {
            indices
                .iter()
                .map(|&i| &self.shortcuts[i])
                .filter(move |s| s.keystrokes.len() == len)
                .filter_map(|s| s.target.as_ref())
        };
        let focused = focus.map(Owner::from);
        candidates()
            .find(|t| Some(&t.plugin) == focused.as_ref())
            .or_else(|| candidates().next())
            .cloned()
    }

    /// Display string of the first shortcut bound to `target`
    pub fn shortcut_for(&self, target: &ActionRef) -> Option<String> {
        self.shortcuts
            .iter()
            .find(|s| s.target.as_ref() == Some(target))
            .map(Shortcut::display_string)
    }

    /// Write shortcut texts onto every registered action they resolve to
    pub fn apply_to_actions(&self, ui: &UiRegistry) -> usize {
        let mut applied = 0;
        for shortcut in &self.shortcuts {
            let Some(target) = &shortcut.target else {
                continue;
            };
            if let Ok(action) = resolve(ui, target) {
                action.set_shortcut(Some(shortcut.display_string()));
                applied += 1;
            }
        }
        applied
    }
}

/// Look `target` up in its own context, then in the global one
pub fn resolve(ui: &UiRegistry, target: &ActionRef) -> Result<Rc<Action>> {
    let own = ui
        .actions
        .get(&target.action, target.plugin.clone(), target.context.clone());
    match own {
        Err(e) if target.context != Context::Global => ui
            .actions
            .get(&target.action, target.plugin.clone(), Context::Global)
            .map_err(|_| e),
        other => other,
    }
}

/// Layer `user` over `base`: same keys replace, `unbound` removes
pub fn merge_shortcuts(base: Vec<Shortcut>, user: Vec<Shortcut>) -> Vec<Shortcut> {
    let mut result = base;
    for shortcut in user {
        match result.iter().position(|s| s.keystrokes == shortcut.keystrokes) {
            Some(idx) if shortcut.target.is_none() => {
                result.remove(idx);
            }
            Some(idx) => result[idx] = shortcut,
            None if shortcut.target.is_some() => result.push(shortcut),
            None => {}
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Msg;
    use crate::shortcuts::types::Modifiers;

    fn ctrl(c: char) -> Keystroke {
        Keystroke::char_with_mods(c, Modifiers::CTRL)
    }

    #[test]
    fn test_focused_plugin_wins() {
        let mut map = ShortcutMap::with_shortcuts(vec![
            Shortcut::new(ctrl('f'), ActionRef::new("main", "_", "find")),
            Shortcut::new(ctrl('f'), ActionRef::new("editor", "_", "find")),
        ]);

        let editor = PluginId::from("editor");
        assert_eq!(
            map.handle_keystroke(ctrl('f'), Some(&editor)),
            KeyAction::Trigger(ActionRef::new("editor", "_", "find"))
        );
        assert_eq!(
            map.handle_keystroke(ctrl('f'), None),
            KeyAction::Trigger(ActionRef::new("main", "_", "find"))
        );
    }

    #[test]
    fn test_chord() {
        let mut map = ShortcutMap::with_shortcuts(vec![Shortcut::chord(
            vec![ctrl('k'), Keystroke::char('m')],
            ActionRef::new("main", "_", "maximize"),
        )]);

        assert_eq!(map.handle_keystroke(ctrl('k'), None), KeyAction::AwaitMore);
        assert_eq!(
            map.handle_keystroke(Keystroke::char('m'), None),
            KeyAction::Trigger(ActionRef::new("main", "_", "maximize"))
        );
        assert_eq!(map.handle_keystroke(ctrl('k'), None), KeyAction::AwaitMore);
        assert_eq!(map.handle_keystroke(Keystroke::char('x'), None), KeyAction::NoMatch);
    }

    #[test]
    fn test_merge_replaces_and_unbinds() {
        let base = vec![
            Shortcut::new(ctrl('s'), ActionRef::new("editor", "_", "save")),
            Shortcut::new(ctrl('q'), ActionRef::new("main", "_", "quit")),
        ];
        let user = vec![
            Shortcut::new(ctrl('s'), ActionRef::new("editor", "_", "save_all")),
            Shortcut::unbound(vec![ctrl('q')]),
        ];
        let merged = merge_shortcuts(base, user);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].target.as_ref().unwrap().action, "save_all");
    }

    #[test]
    fn test_resolve_falls_back_to_global() {
        let mut ui = UiRegistry::new();
        let action = Rc::new(Action::new("save", "Save", Msg::plugin_action("editor", "save")));
        ui.actions.register(&action, "save", "editor", "_");

        let target = ActionRef::new("editor", "toolbar", "save");
        assert!(Rc::ptr_eq(&resolve(&ui, &target).unwrap(), &action));

        let missing = ActionRef::new("editor", "toolbar", "open");
        assert!(resolve(&ui, &missing).is_err());
    }

    #[test]
    fn test_apply_to_actions() {
        let mut ui = UiRegistry::new();
        let action = Rc::new(Action::new("save", "Save", Msg::plugin_action("editor", "save")));
        ui.actions.register(&action, "save", "editor", "toolbar");

        let map = ShortcutMap::with_shortcuts(vec![Shortcut::new(
            ctrl('s'),
            ActionRef::new("editor", "toolbar", "save"),
        )]);
        assert_eq!(map.apply_to_actions(&ui), 1);
        assert_eq!(action.shortcut().as_deref(), Some("Ctrl+S"));
    }

    #[test]
    fn test_embedded_defaults_parse() {
        assert!(parse_shortcuts_yaml(DEFAULT_SHORTCUTS_YAML).is_ok());
    }
}
