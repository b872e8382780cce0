//! Pane layouts
//!
//! - `LayoutEngine`: save, restore, presets, maximize, custom layouts
//! - `LayoutSnapshot`: the versioned, serializable arrangement
//! - `LayoutStore`: the JSON file the arrangement is persisted to

mod engine;
mod presets;
mod snapshot;
mod store;

pub use engine::{LayoutEngine, PaneSettings, ReadyPane, ReadySet};
pub use presets::{Preset, PresetArea};
pub use snapshot::{AreaState, FloatingState, LayoutSnapshot, TabGroupState, WINDOW_STATE_VERSION};
pub use store::{LayoutFile, LayoutStore, LoadOutcome};
