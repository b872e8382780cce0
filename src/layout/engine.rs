//! Saving, restoring and rearranging panes
//!
//! The engine owns the per-pane settings that outlive a session (the
//! "undocked before hidden" flag and floating window geometry), the stored
//! pre-maximize arrangement and the named custom layouts. The arrangement
//! itself always lives in the `DockFrame`.

use std::collections::{BTreeMap, BTreeSet};

use super::presets::Preset;
use super::snapshot::{AreaState, FloatingState, LayoutSnapshot, TabGroupState};
use super::store::LayoutFile;
use crate::error::{Result, RuntimeError};
use crate::host::{Arrangement, DockArea, DockFrame, FloatingWindow, Rect};
use crate::plugin::PluginId;

/// A Ready dockable plugin as seen by the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyPane {
    pub area: DockArea,
    pub title: String,
    pub icon: String,
}

/// Ready dockable plugins keyed by id
pub type ReadySet = BTreeMap<PluginId, ReadyPane>;

/// Per-pane settings persisted across sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneSettings {
    pub undocked_before_hidden: bool,
    pub window_geometry: Option<Rect>,
}

#[derive(Debug, Clone)]
struct Maximized {
    plugin: PluginId,
    previous: Arrangement,
}

#[derive(Debug, Default)]
pub struct LayoutEngine {
    panes: BTreeMap<PluginId, PaneSettings>,
    maximized: Option<Maximized>,
    custom: BTreeMap<String, LayoutSnapshot>,
    locked: bool,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Per-pane settings
    // ========================================================================

    pub fn undocked_before_hidden(&self, id: &PluginId) -> bool {
        self.panes
            .get(id)
            .is_some_and(|p| p.undocked_before_hidden)
    }

    pub fn set_undocked_before_hidden(&mut self, id: &PluginId, undocked: bool) {
        self.panes.entry(id.clone()).or_default().undocked_before_hidden = undocked;
    }

    pub fn window_geometry(&self, id: &PluginId) -> Option<Rect> {
        self.panes.get(id).and_then(|p| p.window_geometry)
    }

    pub fn set_window_geometry(&mut self, id: &PluginId, geometry: Rect) {
        self.panes.entry(id.clone()).or_default().window_geometry = Some(geometry);
    }

    pub fn pane_settings(&self, id: &PluginId) -> Option<&PaneSettings> {
        self.panes.get(id)
    }

    /// Whether pane title bars are locked
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    // ========================================================================
    // Save / restore
    // ========================================================================

    /// Capture the current arrangement
    ///
    /// While a pane is maximized this describes the arrangement underneath,
    /// with `maximized` naming the pane.
    pub fn save(&self, frame: &DockFrame) -> LayoutSnapshot {
        let (arrangement, maximized) = match &self.maximized {
            Some(m) => (&m.previous, Some(m.plugin.clone())),
            None => (frame.arrangement(), None),
        };

        let areas = DockArea::ALL
            .into_iter()
            .map(|area| {
                let slot = arrangement.docks.slot(area);
                AreaState {
                    area,
                    size: slot.size_logical,
                    groups: slot
                        .groups
                        .iter()
                        .map(|g| TabGroupState {
                            plugins: g.plugin_ids.clone(),
                            active: g.active().cloned(),
                        })
                        .collect(),
                }
            })
            .collect();

        LayoutSnapshot {
            version: super::snapshot::WINDOW_STATE_VERSION,
            window: frame.geometry(),
            areas,
            hidden: arrangement.hidden.clone(),
            floating: frame
                .floating_windows()
                .map(|(id, w)| FloatingState {
                    plugin: id.clone(),
                    geometry: w.geometry,
                })
                .collect(),
            maximized,
            undocked_before_hidden: self
                .panes
                .iter()
                .filter(|(_, p)| p.undocked_before_hidden)
                .map(|(id, _)| id.clone())
                .collect(),
        }
    }

    /// Rebuild the arrangement from `snapshot`
    ///
    /// A snapshot from another schema version is replaced by the default
    /// preset. Plugins the snapshot names that are not Ready are skipped
    /// with a warning; Ready plugins it does not name end up hidden in
    /// their default area. Returns false when the default preset was used.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot, frame: &mut DockFrame, ready: &ReadySet) -> bool {
        if !snapshot.is_current() {
            tracing::warn!(
                found = snapshot.version,
                expected = super::snapshot::WINDOW_STATE_VERSION,
                "layout schema version mismatch, applying the default layout"
            );
            self.apply_preset(Preset::Default, frame, ready);
            return false;
        }

        self.reset_arrangement(frame);

        let mut skipped = BTreeSet::new();
        for area_state in &snapshot.areas {
            frame
                .docks_mut()
                .slot_mut(area_state.area)
                .set_size(area_state.size);

            for group in &area_state.groups {
                let members: Vec<&PluginId> = group
                    .plugins
                    .iter()
                    .filter(|id| {
                        let usable = ready.contains_key(*id) && frame.has_dock_widget(id);
                        if !usable {
                            skipped.insert((*id).clone());
                        }
                        usable
                    })
                    .collect();
                place_group(frame, area_state.area, &members);
                if let Some(active) = group.active.as_ref().filter(|a| members.contains(a)) {
                    frame.raise(active);
                }
            }
        }
        for floating in &snapshot.floating {
            if !ready.contains_key(&floating.plugin) {
                skipped.insert(floating.plugin.clone());
            }
        }
        for id in &skipped {
            tracing::warn!(plugin = %id, "layout references a plugin that is not ready, skipping it");
        }

        let mentioned = snapshot.mentioned();
        for (id, pane) in ready {
            if !frame.has_dock_widget(id) {
                continue;
            }
            if frame.placement(id).is_none() {
                frame.place(id, pane.area);
            }
            if snapshot.hidden.contains(id) || !mentioned.contains(id) {
                frame.hide(id);
            }
        }

        for floating in &snapshot.floating {
            let Some(pane) = ready.get(&floating.plugin) else {
                continue;
            };
            let geometry = frame.screens().reposition(floating.geometry);
            frame.float(
                &floating.plugin,
                FloatingWindow {
                    title: pane.title.clone(),
                    icon: pane.icon.clone(),
                    geometry,
                },
            );
            self.set_window_geometry(&floating.plugin, geometry);
        }

        let window = frame.screens().reposition(snapshot.window);
        frame.set_geometry(window);

        for id in ready.keys() {
            let undocked = snapshot.undocked_before_hidden.contains(id);
            self.set_undocked_before_hidden(id, undocked);
        }

        if let Some(id) = &snapshot.maximized {
            if ready.contains_key(id) {
                self.maximize(id, frame);
            }
        }

        tracing::debug!(
            visible = frame.visible_docked().len(),
            floating = snapshot.floating.len(),
            skipped = skipped.len(),
            "restored layout"
        );
        true
    }

    /// Apply a built-in preset
    ///
    /// The result depends only on `preset` and the Ready set.
    pub fn apply_preset(&mut self, preset: Preset, frame: &mut DockFrame, ready: &ReadySet) {
        self.reset_arrangement(frame);

        let usable: BTreeSet<PluginId> = ready
            .keys()
            .filter(|id| frame.has_dock_widget(id))
            .cloned()
            .collect();

        let named: BTreeSet<PluginId> = preset
            .areas()
            .iter()
            .flat_map(|a| a.plugin_ids.iter())
            .map(|id| PluginId::from(*id))
            .collect();
        let unassigned: Vec<PluginId> = usable
            .iter()
            .filter(|id| !named.contains(*id))
            .cloned()
            .collect();

        for area in preset.areas() {
            let mut members: Vec<PluginId> = area
                .plugin_ids
                .iter()
                .map(|id| PluginId::from(*id))
                .filter(|id| usable.contains(id))
                .collect();
            let mut hidden: BTreeSet<PluginId> = area
                .hidden_plugin_ids
                .iter()
                .map(|id| PluginId::from(*id))
                .collect();
            if area.default {
                members.extend(unassigned.iter().cloned());
                hidden.extend(unassigned.iter().cloned());
            }

            let refs: Vec<&PluginId> = members.iter().collect();
            place_group(frame, area.area, &refs);
            for id in &members {
                if hidden.contains(id) {
                    frame.hide(id);
                } else {
                    frame.show(id);
                }
            }
            if let Some(first_visible) = members.iter().find(|id| !hidden.contains(*id)) {
                frame.raise(first_visible);
            }
        }

        tracing::debug!(preset = %preset, "applied layout preset");
    }

    /// Apply a preset by key or display name
    pub fn apply_preset_by_name(&mut self, name: &str, frame: &mut DockFrame, ready: &ReadySet) -> Result<()> {
        let preset = Preset::from_name(name).ok_or_else(|| RuntimeError::NotFound {
            kind: "layout preset",
            id: name.to_string(),
            plugin: "main".to_string(),
            context: "_".to_string(),
        })?;
        self.apply_preset(preset, frame, ready);
        Ok(())
    }

    /// Dock every floating window and forget placements, keeping geometry
    fn reset_arrangement(&mut self, frame: &mut DockFrame) {
        if self.maximized.take().is_some() {
            frame.set_central(None);
        }
        let floating: Vec<PluginId> = frame.floating_windows().map(|(id, _)| id.clone()).collect();
        for id in floating {
            if let Some(window) = frame.unfloat(&id) {
                self.set_window_geometry(&id, window.geometry);
            }
        }
        frame.clear_placements();
    }

    // ========================================================================
    // Maximize
    // ========================================================================

    pub fn maximized(&self) -> Option<&PluginId> {
        self.maximized.as_ref().map(|m| &m.plugin)
    }

    /// Let `id` fill the main window
    ///
    /// Another maximized pane is restored first. Floating panes cannot be
    /// maximized.
    pub fn maximize(&mut self, id: &PluginId, frame: &mut DockFrame) -> bool {
        if !frame.has_dock_widget(id) || frame.is_floating(id) {
            return false;
        }
        if self.maximized() == Some(id) {
            return true;
        }
        self.unmaximize(frame);

        let previous = frame.arrangement().clone();
        let others: Vec<PluginId> = frame
            .dock_widgets()
            .filter(|other| *other != id && !frame.is_floating(other))
            .cloned()
            .collect();
        for other in &others {
            frame.hide(other);
        }
        frame.show(id);
        frame.raise(id);
        frame.set_central(Some(id.clone()));

        tracing::debug!(plugin = %id, "maximized pane");
        self.maximized = Some(Maximized {
            plugin: id.clone(),
            previous,
        });
        true
    }

    /// Put back the arrangement from before `maximize`
    pub fn unmaximize(&mut self, frame: &mut DockFrame) -> bool {
        let Some(maximized) = self.maximized.take() else {
            return false;
        };
        frame.set_arrangement(maximized.previous);
        frame.set_central(None);
        tracing::debug!(plugin = %maximized.plugin, "unmaximized pane");
        true
    }

    pub fn toggle_maximize(&mut self, id: &PluginId, frame: &mut DockFrame) -> bool {
        if self.maximized() == Some(id) {
            self.unmaximize(frame);
            false
        } else {
            self.maximize(id, frame)
        }
    }

    /// Drop a pane from the stored pre-maximize arrangement
    pub fn forget_pane(&mut self, id: &PluginId, frame: &mut DockFrame) {
        if self.maximized() == Some(id) {
            self.unmaximize(frame);
        } else if let Some(m) = &mut self.maximized {
            m.previous.docks.remove(id);
            m.previous.hidden.remove(id);
        }
    }

    // ========================================================================
    // Custom layouts
    // ========================================================================

    pub fn save_custom(&mut self, name: impl Into<String>, frame: &DockFrame) {
        let name = name.into();
        tracing::debug!(layout = %name, "saved custom layout");
        let snapshot = self.save(frame);
        self.custom.insert(name, snapshot);
    }

    pub fn load_custom(&mut self, name: &str, frame: &mut DockFrame, ready: &ReadySet) -> Result<()> {
        let snapshot = self.custom.get(name).cloned().ok_or_else(|| RuntimeError::NotFound {
            kind: "custom layout",
            id: name.to_string(),
            plugin: "main".to_string(),
            context: "_".to_string(),
        })?;
        self.restore(&snapshot, frame, ready);
        Ok(())
    }

    pub fn remove_custom(&mut self, name: &str) -> bool {
        self.custom.remove(name).is_some()
    }

    pub fn custom_names(&self) -> Vec<&str> {
        self.custom.keys().map(String::as_str).collect()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Everything that goes into the layout file
    pub fn to_file(&self, frame: &DockFrame) -> LayoutFile {
        LayoutFile {
            version: super::snapshot::WINDOW_STATE_VERSION,
            current: Some(self.save(frame)),
            undocked_before_hidden: self
                .panes
                .iter()
                .map(|(id, p)| (id.clone(), p.undocked_before_hidden))
                .collect(),
            window_geometry: self
                .panes
                .iter()
                .filter_map(|(id, p)| p.window_geometry.map(|g| (id.clone(), g)))
                .collect(),
            custom: self.custom.clone(),
            locked: self.locked,
        }
    }

    /// Take over per-pane settings and custom layouts from a loaded file,
    /// returning the snapshot to restore
    pub fn load_file(&mut self, file: LayoutFile) -> Option<LayoutSnapshot> {
        for (id, undocked) in file.undocked_before_hidden {
            self.set_undocked_before_hidden(&id, undocked);
        }
        for (id, geometry) in file.window_geometry {
            self.set_window_geometry(&id, geometry);
        }
        self.custom = file.custom;
        self.locked = file.locked;
        file.current
    }
}

/// Place `members` as one tab group of `area`, the first one as base
fn place_group(frame: &mut DockFrame, area: DockArea, members: &[&PluginId]) {
    let Some((first, rest)) = members.split_first() else {
        return;
    };
    frame.place(first, area);
    for other in rest {
        frame.tabify(first, other);
    }
}
