//! Dockable containers
//!
//! - `DockableContainer`: toolbars, options menu, corner region, default
//!   pane actions and empty-state overlay of one plugin
//! - `Pane`: docking, floating and hiding of a container against the frame
//! - `Toolbar`, `CornerWidget`: the container's button surfaces

mod corner;
mod dockable;
mod pane;
mod toolbar;

pub use corner::{CornerWidget, OPTIONS_BUTTON};
pub use dockable::{
    toggle_view_action_id, DockableContainer, CLOSE_PANE, DOCK_PANE, LOCK_UNLOCK_POSITION,
    MAIN_TOOLBAR, MAIN_WIDGET_CONTEXT, OPTIONS_MENU, UNDOCK_PANE,
};
pub use pane::{pane_state, Pane, PaneState};
pub use toolbar::{Toolbar, ToolbarItem, DEFAULT_SECTION};
