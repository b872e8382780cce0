//! Message types for the Elm-style architecture
//!
//! Every UI command (menu entry, toolbar button, key binding) ends up as one
//! of these messages and flows through `update::update`.

use crate::plugin::PluginId;
use crate::shortcuts::Keystroke;

/// Operations on one plugin's pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneMsg {
    /// Detach into a floating window
    Undock(PluginId),
    /// Put a floating window back into its dock slot
    Dock(PluginId),
    /// Hide the pane (the "Close" entry of the options menu)
    Close(PluginId),
    /// Show or hide the pane
    ToggleView { plugin: PluginId, visible: bool },
    /// Swap between a movable and a locked title bar
    LockUnlock(PluginId),
    /// Show the pane if needed and raise its tab
    Raise {
        plugin: PluginId,
        /// `None` focuses only when the plugin opts in
        force_focus: Option<bool>,
    },
    FocusIn(PluginId),
    FocusOut(PluginId),
    /// Fill the main window with this pane, or restore the previous layout
    ToggleMaximize(PluginId),
}

/// Layout-wide operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutMsg {
    /// Apply a built-in preset by name
    ApplyPreset(String),
    /// Store the current arrangement under a name
    SaveCustom(String),
    /// Restore an arrangement stored with `SaveCustom`
    LoadCustom(String),
    /// Lock or unlock every pane's title bar
    LockAll(bool),
    /// Write the current layout to disk
    Persist,
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Pane(PaneMsg),
    Layout(LayoutMsg),
    /// A plugin-defined action, routed to `Plugin::on_action` of its owner
    Plugin {
        plugin: PluginId,
        action: String,
        checked: bool,
    },
    /// A key press, resolved through the shortcut map
    Key(Keystroke),
}

impl Msg {
    pub fn pane(msg: PaneMsg) -> Self {
        Msg::Pane(msg)
    }

    pub fn layout(msg: LayoutMsg) -> Self {
        Msg::Layout(msg)
    }

    pub fn plugin_action(plugin: impl Into<PluginId>, action: impl Into<String>) -> Self {
        Msg::Plugin {
            plugin: plugin.into(),
            action: action.into(),
            checked: false,
        }
    }

    /// Copy of this message carrying the checked state of a checkable action
    ///
    /// Only messages with a boolean payload are affected.
    pub fn with_checked(&self, checked: bool) -> Self {
        match self {
            Msg::Plugin { plugin, action, .. } => Msg::Plugin {
                plugin: plugin.clone(),
                action: action.clone(),
                checked,
            },
            Msg::Pane(PaneMsg::ToggleView { plugin, .. }) => Msg::Pane(PaneMsg::ToggleView {
                plugin: plugin.clone(),
                visible: checked,
            }),
            Msg::Layout(LayoutMsg::LockAll(_)) => Msg::Layout(LayoutMsg::LockAll(checked)),
            other => other.clone(),
        }
    }

    /// Plugin a message is addressed to, if any
    pub fn target(&self) -> Option<&PluginId> {
        match self {
            Msg::Plugin { plugin, .. } => Some(plugin),
            Msg::Pane(pane) => Some(pane.plugin()),
            Msg::Layout(_) | Msg::Key(_) => None,
        }
    }
}

impl PaneMsg {
    pub fn plugin(&self) -> &PluginId {
        match self {
            PaneMsg::Undock(id)
            | PaneMsg::Dock(id)
            | PaneMsg::Close(id)
            | PaneMsg::LockUnlock(id)
            | PaneMsg::FocusIn(id)
            | PaneMsg::FocusOut(id)
            | PaneMsg::ToggleMaximize(id) => id,
            PaneMsg::ToggleView { plugin, .. } | PaneMsg::Raise { plugin, .. } => plugin,
        }
    }
}
