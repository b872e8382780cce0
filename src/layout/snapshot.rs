//! Versioned description of a pane arrangement

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::host::{DockArea, Rect};
use crate::plugin::PluginId;

/// Current schema version
///
/// Bump whenever the serialized shape of `LayoutSnapshot` changes; older
/// snapshots are then replaced by the default preset.
pub const WINDOW_STATE_VERSION: u32 = 3;

/// Tabs sharing one dock slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroupState {
    pub plugins: Vec<PluginId>,
    pub active: Option<PluginId>,
}

/// Tab groups of one dock area, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaState {
    pub area: DockArea,
    /// Width or height of the area in logical pixels
    pub size: f32,
    pub groups: Vec<TabGroupState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingState {
    pub plugin: PluginId,
    pub geometry: Rect,
}

/// Which panes are where
///
/// Serialized as a self-describing JSON object carrying `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    /// Geometry of the host window
    pub window: Rect,
    pub areas: Vec<AreaState>,
    /// Docked panes that are not shown
    #[serde(default)]
    pub hidden: BTreeSet<PluginId>,
    #[serde(default)]
    pub floating: Vec<FloatingState>,
    #[serde(default)]
    pub maximized: Option<PluginId>,
    #[serde(default)]
    pub undocked_before_hidden: BTreeSet<PluginId>,
}

impl LayoutSnapshot {
    /// An empty snapshot at the current version
    pub fn empty(window: Rect) -> Self {
        Self {
            version: WINDOW_STATE_VERSION,
            window,
            areas: Vec::new(),
            hidden: BTreeSet::new(),
            floating: Vec::new(),
            maximized: None,
            undocked_before_hidden: BTreeSet::new(),
        }
    }

    pub fn is_current(&self) -> bool {
        self.version == WINDOW_STATE_VERSION
    }

    /// Every plugin placed in a tab group or a floating window
    pub fn mentioned(&self) -> BTreeSet<&PluginId> {
        self.areas
            .iter()
            .flat_map(|a| a.groups.iter())
            .flat_map(|g| g.plugins.iter())
            .chain(self.floating.iter().map(|f| &f.plugin))
            .collect()
    }

    pub fn area(&self, area: DockArea) -> Option<&AreaState> {
        self.areas.iter().find(|a| a.area == area)
    }

    pub fn is_floating(&self, id: &PluginId) -> bool {
        self.floating.iter().any(|f| &f.plugin == id)
    }

    /// Panes shown in a dock, i.e. placed and neither hidden nor floating
    pub fn visible_docked(&self) -> Vec<&PluginId> {
        self.areas
            .iter()
            .flat_map(|a| a.groups.iter())
            .flat_map(|g| g.plugins.iter())
            .filter(|id| !self.hidden.contains(*id) && !self.is_floating(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PluginId {
        PluginId::from(s)
    }

    fn sample() -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot::empty(Rect::new(0, 0, 1280, 800));
        snapshot.areas.push(AreaState {
            area: DockArea::Right,
            size: 300.0,
            groups: vec![TabGroupState {
                plugins: vec![id("help"), id("plots")],
                active: Some(id("plots")),
            }],
        });
        snapshot.hidden.insert(id("help"));
        snapshot.floating.push(FloatingState {
            plugin: id("console"),
            geometry: Rect::new(100, 100, 400, 300),
        });
        snapshot
    }

    #[test]
    fn test_mentioned_includes_floating() {
        let snapshot = sample();
        let mentioned = snapshot.mentioned();
        assert!(mentioned.contains(&id("help")));
        assert!(mentioned.contains(&id("console")));
        assert!(!mentioned.contains(&id("editor")));
    }

    #[test]
    fn test_visible_docked() {
        assert_eq!(sample().visible_docked(), vec![&id("plots")]);
    }

    #[test]
    fn test_json_is_self_describing() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["version"], WINDOW_STATE_VERSION);
        assert_eq!(json["areas"][0]["area"], "Right");
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"version":3,"window":{"x":0,"y":0,"width":10,"height":10},"areas":[]}"#;
        let snapshot: LayoutSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_current());
        assert!(snapshot.hidden.is_empty());
        assert_eq!(snapshot.maximized, None);
    }
}
