//! Moving a container between docked, floating and hidden
//!
//! A `Pane` borrows one container together with the host frame and the
//! layout engine for the duration of an operation. The pane's state is not
//! stored anywhere: it is read back from the frame each time.

use std::fmt;

use super::dockable::DockableContainer;
use crate::host::{DockFrame, FloatingWindow, Rect};
use crate::layout::LayoutEngine;
use crate::plugin::PluginId;

/// Size of a floating window with no saved geometry
const DEFAULT_WINDOW_SIZE: (i32, i32) = (800, 600);

/// Where a pane currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneState {
    Hidden,
    DockedVisible,
    Floating,
    /// The plugin was torn down
    Closed,
}

impl fmt::Display for PaneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaneState::Hidden => "hidden",
            PaneState::DockedVisible => "docked",
            PaneState::Floating => "floating",
            PaneState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Derive the state of `id` from the frame
///
/// Floating wins over hidden, which wins over docked.
pub fn pane_state(frame: &DockFrame, id: &PluginId) -> PaneState {
    if !frame.has_dock_widget(id) {
        PaneState::Closed
    } else if frame.is_floating(id) {
        PaneState::Floating
    } else if frame.is_hidden(id) || frame.placement(id).is_none() {
        PaneState::Hidden
    } else {
        PaneState::DockedVisible
    }
}

pub struct Pane<'a> {
    pub container: &'a mut DockableContainer,
    pub frame: &'a mut DockFrame,
    pub layout: &'a mut LayoutEngine,
}

impl<'a> Pane<'a> {
    pub fn new(
        container: &'a mut DockableContainer,
        frame: &'a mut DockFrame,
        layout: &'a mut LayoutEngine,
    ) -> Self {
        Self {
            container,
            frame,
            layout,
        }
    }

    fn id(&self) -> PluginId {
        self.container.plugin().clone()
    }

    pub fn state(&self) -> PaneState {
        if self.container.is_closed() {
            return PaneState::Closed;
        }
        pane_state(self.frame, self.container.plugin())
    }

    /// Detach the container into a floating window
    ///
    /// The window gets the container's title and icon and its saved
    /// geometry, moved onto the primary screen if needed. The dock slot keeps
    /// its tab position and is hidden behind the window.
    pub fn create_window(&mut self) {
        let id = self.id();
        if !self.container.is_dockable() || !self.frame.has_dock_widget(&id) {
            tracing::warn!(plugin = %id, "cannot undock a pane without a dock widget");
            return;
        }
        if self.frame.is_floating(&id) {
            return;
        }
        if pane_state(self.frame, &id) != PaneState::DockedVisible {
            tracing::debug!(plugin = %id, "ignoring undock of a hidden pane");
            return;
        }
        if self.layout.maximized() == Some(&id) {
            self.layout.unmaximize(self.frame);
        }

        tracing::debug!(plugin = %id, "undocking pane");
        let geometry = self.restore_geometry(&id);
        self.frame.float(
            &id,
            FloatingWindow {
                title: self.container.title().to_string(),
                icon: self.container.icon().to_string(),
                geometry,
            },
        );
        self.layout.set_window_geometry(&id, geometry);
        self.layout.set_undocked_before_hidden(&id, false);

        self.container.sync_dock_actions(true, true);
        self.container.set_visible_state(true);
    }

    fn restore_geometry(&self, id: &PluginId) -> Rect {
        let screens = self.frame.screens();
        match self.layout.window_geometry(id) {
            Some(geometry) => screens.reposition(geometry),
            None => screens
                .primary()
                .centered(DEFAULT_WINDOW_SIZE.0, DEFAULT_WINDOW_SIZE.1),
        }
    }

    /// Put a floating container back into its dock slot
    pub fn dock_window(&mut self) {
        self.close_window(false);
    }

    /// Destroy the floating window, saving its geometry
    ///
    /// With `save_undocked` the pane remembers that it was floating so that
    /// showing it again re-floats it. Called on a docked pane this resets
    /// that memory.
    pub fn close_window(&mut self, save_undocked: bool) {
        let id = self.id();
        let Some(window) = self.frame.unfloat(&id) else {
            self.layout.set_undocked_before_hidden(&id, false);
            return;
        };

        tracing::debug!(plugin = %id, save_undocked, "docking pane back");
        self.layout.set_window_geometry(&id, window.geometry);
        self.layout.set_undocked_before_hidden(&id, save_undocked);

        if self.frame.placement(&id).is_none() {
            let area = self.container.default_area();
            self.frame.place(&id, area);
        }
        self.frame.show(&id);
        self.frame.raise(&id);

        self.container.sync_dock_actions(false, true);
        self.container.set_visible_state(true);
    }

    /// Show or hide the pane
    ///
    /// Hiding a floating pane docks it first and remembers that it was
    /// floating; showing it again re-floats it. Ignored while the host is
    /// still applying its initial layout.
    pub fn toggle_view(&mut self, visible: bool) {
        let id = self.id();
        if self.frame.is_setting_up() {
            tracing::debug!(plugin = %id, visible, "ignoring toggle_view while setting up");
            return;
        }
        if !self.container.is_dockable() || !self.frame.has_dock_widget(&id) {
            return;
        }
        if self.layout.maximized().is_some() {
            self.layout.unmaximize(self.frame);
        }

        if self.frame.is_floating(&id) {
            self.close_window(true);
        }

        if visible {
            if self.frame.placement(&id).is_none() {
                let area = self.container.default_area();
                self.frame.place(&id, area);
            }
            self.frame.show(&id);
            self.frame.raise(&id);
            if self.layout.undocked_before_hidden(&id) {
                self.create_window();
            }
        } else {
            self.frame.hide(&id);
            if self.frame.focus() == Some(&id) {
                self.frame.set_focus(None);
            }
        }

        let floating = self.frame.is_floating(&id);
        self.container.sync_dock_actions(floating, visible);
        self.container.set_visible_state(visible);
    }

    /// Raise the pane and decide whether it takes keyboard focus
    ///
    /// `force_focus: None` focuses only if the plugin opted in and the pane
    /// is being revealed. Returns true when focus was given.
    pub fn change_visibility(&mut self, enable: bool, force_focus: Option<bool>) -> bool {
        let id = self.id();
        if !self.frame.has_dock_widget(&id) {
            return false;
        }

        if enable && !self.frame.is_floating(&id) {
            self.frame.raise(&id);
        }

        if enable {
            self.container.show_content_widget();
        } else if !self.container.has_content() {
            self.container.show_empty_message();
        }

        let focus = match force_focus {
            Some(force) => force,
            None => enable && self.container.raise_and_focus(),
        };
        if focus {
            tracing::trace!(plugin = %id, widget = %self.container.get_focus_widget(), "focusing pane");
            self.frame.set_focus(Some(id));
        }
        focus
    }

    /// Show the pane if needed, then raise it
    pub fn switch_to(&mut self, force_focus: Option<bool>) -> bool {
        let id = self.id();
        if !self.frame.is_visible(&id) {
            self.toggle_view(true);
        }
        self.change_visibility(true, force_focus)
    }

    /// Swap between a draggable and a locked title bar
    pub fn lock_unlock_position(&mut self) {
        let locked = !self.container.is_title_bar_locked();
        self.container.set_title_bar_locked(locked);
    }
}
