//! The host-window surface consumed by the runtime
//!
//! `DockFrame` is the model of the main window: which dock widgets exist,
//! how they are tabbed, which are hidden or floating, which one is
//! maximized, plus the status bar and the "setting up" flag raised while the
//! initial layout is applied.

use std::collections::{BTreeMap, BTreeSet};

use super::dock::{DockArea, DockLayout, Placement};
use super::geometry::{Rect, Screens};
use crate::plugin::PluginId;

/// A detached top-level window hosting one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingWindow {
    pub title: String,
    pub icon: String,
    pub geometry: Rect,
}

/// Transient status bar text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub timeout_ms: u64,
}

/// Docked arrangement together with the hidden set
///
/// This is what maximizing a pane replaces and what unmaximizing puts back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    pub docks: DockLayout,
    pub hidden: BTreeSet<PluginId>,
}

#[derive(Debug)]
pub struct DockFrame {
    /// Registered dock widgets and their default area
    widgets: BTreeMap<PluginId, DockArea>,
    arrangement: Arrangement,
    floating: BTreeMap<PluginId, FloatingWindow>,
    /// Pane filling the central area while maximized
    central: Option<PluginId>,
    geometry: Rect,
    screens: Screens,
    setting_up: bool,
    status: Option<StatusMessage>,
    focus: Option<PluginId>,
}

impl Default for DockFrame {
    fn default() -> Self {
        Self::new(Screens::default())
    }
}

impl DockFrame {
    pub fn new(screens: Screens) -> Self {
        let geometry = screens.primary().centered(1280, 800);
        Self {
            widgets: BTreeMap::new(),
            arrangement: Arrangement::default(),
            floating: BTreeMap::new(),
            central: None,
            geometry,
            screens,
            setting_up: false,
            status: None,
            focus: None,
        }
    }

    // ========================================================================
    // Dock widgets
    // ========================================================================

    /// Add a dock widget for `id` in `area`, initially hidden
    pub fn add_dock_widget(&mut self, id: &PluginId, area: DockArea) {
        if self.widgets.contains_key(id) {
            tracing::warn!(plugin = %id, "dock widget already added");
            return;
        }
        self.widgets.insert(id.clone(), area);
        self.arrangement.docks.place(id.clone(), area);
        self.arrangement.hidden.insert(id.clone());
        tracing::debug!(plugin = %id, ?area, "added dock widget");
    }

    /// Remove the dock widget of `id` together with any floating window
    pub fn remove_dock_widget(&mut self, id: &PluginId) {
        if self.widgets.remove(id).is_none() {
            return;
        }
        self.arrangement.docks.remove(id);
        self.arrangement.hidden.remove(id);
        self.floating.remove(id);
        if self.central.as_ref() == Some(id) {
            self.central = None;
        }
        if self.focus.as_ref() == Some(id) {
            self.focus = None;
        }
        tracing::debug!(plugin = %id, "removed dock widget");
    }

    pub fn has_dock_widget(&self, id: &PluginId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn dock_widgets(&self) -> impl Iterator<Item = &PluginId> {
        self.widgets.keys()
    }

    pub fn default_area(&self, id: &PluginId) -> Option<DockArea> {
        self.widgets.get(id).copied()
    }

    /// Tab `second` together with `first`
    pub fn tabify(&mut self, first: &PluginId, second: &PluginId) -> bool {
        if !self.has_dock_widget(first) || !self.has_dock_widget(second) {
            return false;
        }
        self.arrangement.docks.tabify(first, second)
    }

    /// Dock `id` in `area` if it is not docked anywhere yet
    pub fn place(&mut self, id: &PluginId, area: DockArea) {
        if self.has_dock_widget(id) {
            self.arrangement.docks.place(id.clone(), area);
        }
    }

    pub fn placement(&self, id: &PluginId) -> Option<Placement> {
        self.arrangement.docks.find(id)
    }

    pub fn docks(&self) -> &DockLayout {
        &self.arrangement.docks
    }

    pub(crate) fn docks_mut(&mut self) -> &mut DockLayout {
        &mut self.arrangement.docks
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub fn show(&mut self, id: &PluginId) {
        if self.has_dock_widget(id) {
            self.arrangement.hidden.remove(id);
        }
    }

    pub fn hide(&mut self, id: &PluginId) {
        if self.has_dock_widget(id) {
            self.arrangement.hidden.insert(id.clone());
        }
    }

    pub fn is_hidden(&self, id: &PluginId) -> bool {
        self.arrangement.hidden.contains(id)
    }

    /// Raise the tab of `id` in its group
    pub fn raise(&mut self, id: &PluginId) -> bool {
        self.arrangement.docks.activate(id)
    }

    /// Whether the pane can be seen: floating, or docked and not hidden
    pub fn is_visible(&self, id: &PluginId) -> bool {
        if !self.has_dock_widget(id) {
            return false;
        }
        self.is_floating(id) || (self.placement(id).is_some() && !self.is_hidden(id))
    }

    /// Docked panes currently shown, in area, group and tab order
    pub fn visible_docked(&self) -> Vec<PluginId> {
        self.arrangement
            .docks
            .plugin_ids()
            .filter(|id| !self.is_hidden(id) && !self.is_floating(id))
            .cloned()
            .collect()
    }

    pub fn hidden(&self) -> &BTreeSet<PluginId> {
        &self.arrangement.hidden
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Put back a saved arrangement
    ///
    /// Panes that no longer exist are dropped; panes added since are docked
    /// hidden in their default area.
    pub fn set_arrangement(&mut self, mut arrangement: Arrangement) {
        arrangement.docks.retain(|id| self.widgets.contains_key(id));
        arrangement.hidden.retain(|id| self.widgets.contains_key(id));

        for (id, area) in &self.widgets {
            if !arrangement.docks.contains(id) {
                arrangement.docks.place(id.clone(), *area);
                arrangement.hidden.insert(id.clone());
            }
        }
        self.arrangement = arrangement;
    }

    /// Forget every docked position and hidden flag
    pub fn clear_placements(&mut self) {
        self.arrangement.docks.clear();
        self.arrangement.hidden.clear();
    }

    // ========================================================================
    // Floating windows
    // ========================================================================

    /// Detach `id` into a floating window; its tab slot is kept
    pub fn float(&mut self, id: &PluginId, window: FloatingWindow) {
        if self.has_dock_widget(id) {
            self.floating.insert(id.clone(), window);
        }
    }

    /// Destroy the floating window of `id`, returning it
    pub fn unfloat(&mut self, id: &PluginId) -> Option<FloatingWindow> {
        self.floating.remove(id)
    }

    pub fn is_floating(&self, id: &PluginId) -> bool {
        self.floating.contains_key(id)
    }

    pub fn floating_window(&self, id: &PluginId) -> Option<&FloatingWindow> {
        self.floating.get(id)
    }

    pub fn floating_window_mut(&mut self, id: &PluginId) -> Option<&mut FloatingWindow> {
        self.floating.get_mut(id)
    }

    pub fn floating_windows(&self) -> impl Iterator<Item = (&PluginId, &FloatingWindow)> {
        self.floating.iter()
    }

    // ========================================================================
    // Window state
    // ========================================================================

    pub fn central(&self) -> Option<&PluginId> {
        self.central.as_ref()
    }

    pub fn set_central(&mut self, id: Option<PluginId>) {
        self.central = id;
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Rect) {
        self.geometry = geometry;
    }

    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    pub fn set_screens(&mut self, screens: Screens) {
        self.screens = screens;
    }

    /// Whether the initial layout is still being applied
    pub fn is_setting_up(&self) -> bool {
        self.setting_up
    }

    pub fn set_setting_up(&mut self, setting_up: bool) {
        self.setting_up = setting_up;
    }

    pub fn show_status_message(&mut self, text: impl Into<String>, timeout_ms: u64) {
        let text = text.into();
        tracing::debug!(timeout_ms, "status: {}", text);
        self.status = Some(StatusMessage { text, timeout_ms });
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn focus(&self) -> Option<&PluginId> {
        self.focus.as_ref()
    }

    pub fn set_focus(&mut self, id: Option<PluginId>) {
        self.focus = id;
    }
}
