//! Host window glue
//!
//! - `DockArea`, `TabGroup`, `DockLayout`: the docked arrangement
//! - `DockFrame`: the main-window surface (dock widgets, floating windows,
//!   status bar, "setting up" flag)
//! - `HostWindow`: owns the frame, the plugin registry, the layout engine
//!   and the UI registries, and drives them from messages

mod dock;
mod frame;
mod geometry;
mod window;

pub use dock::{Axis, DockArea, DockLayout, DockSlot, Placement, TabGroup};
pub use frame::{Arrangement, DockFrame, FloatingWindow, StatusMessage};
pub use geometry::{Rect, Screens};
pub use window::HostWindow;
