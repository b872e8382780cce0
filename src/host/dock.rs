//! Dock areas, tab groups and the docked arrangement
//!
//! Panes are referred to by plugin id. A pane lives in exactly one tab group
//! of one dock area; whether it is shown, hidden or floating is tracked by
//! the frame on top of this arrangement.

use serde::{Deserialize, Serialize};

use crate::plugin::PluginId;

/// Side of the host window a dock slot is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DockArea {
    Left,
    Right,
    Top,
    Bottom,
}

impl DockArea {
    /// Returns the axis this area expands along
    pub fn axis(&self) -> Axis {
        match self {
            DockArea::Left | DockArea::Right => Axis::Vertical,
            DockArea::Top | DockArea::Bottom => Axis::Horizontal,
        }
    }

    /// All areas for iteration, in persistence order
    pub const ALL: [DockArea; 4] = [
        DockArea::Left,
        DockArea::Right,
        DockArea::Top,
        DockArea::Bottom,
    ];
}

/// Axis for dock sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Panes sharing one dock slot, presented as tabs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabGroup {
    pub plugin_ids: Vec<PluginId>,
    /// Index of the raised tab (None if the group is empty)
    pub active_index: Option<usize>,
}

impl TabGroup {
    pub fn new(first: PluginId) -> Self {
        Self {
            plugin_ids: vec![first],
            active_index: Some(0),
        }
    }

    pub fn active(&self) -> Option<&PluginId> {
        self.active_index.and_then(|i| self.plugin_ids.get(i))
    }

    pub fn contains(&self, id: &PluginId) -> bool {
        self.plugin_ids.contains(id)
    }

    pub fn push(&mut self, id: PluginId) {
        if !self.plugin_ids.contains(&id) {
            self.plugin_ids.push(id);
            if self.active_index.is_none() {
                self.active_index = Some(0);
            }
        }
    }

    /// Raise the tab of `id`
    pub fn activate(&mut self, id: &PluginId) -> bool {
        match self.plugin_ids.iter().position(|p| p == id) {
            Some(index) => {
                self.active_index = Some(index);
                true
            }
            None => false,
        }
    }

    /// Remove `id`, keeping the active tab stable where possible
    pub fn remove(&mut self, id: &PluginId) -> bool {
        let Some(index) = self.plugin_ids.iter().position(|p| p == id) else {
            return false;
        };
        self.plugin_ids.remove(index);

        self.active_index = match self.active_index {
            _ if self.plugin_ids.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active >= self.plugin_ids.len() => Some(self.plugin_ids.len() - 1),
            other => other,
        };
        true
    }

    pub fn is_empty(&self) -> bool {
        self.plugin_ids.is_empty()
    }
}

/// One dock area of the host window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockSlot {
    pub area: DockArea,
    pub groups: Vec<TabGroup>,
    /// Size in logical pixels (width for left/right, height for top/bottom)
    pub size_logical: f32,
}

impl DockSlot {
    pub fn new(area: DockArea) -> Self {
        Self {
            area,
            groups: Vec::new(),
            size_logical: match area.axis() {
                Axis::Vertical => 250.0,
                Axis::Horizontal => 200.0,
            },
        }
    }

    /// Minimum size in logical pixels
    pub fn min_size(&self) -> f32 {
        150.0
    }

    pub fn set_size(&mut self, size: f32) {
        self.size_logical = size.max(self.min_size());
    }

    pub fn has_panes(&self) -> bool {
        self.groups.iter().any(|g| !g.is_empty())
    }

    fn prune(&mut self) {
        self.groups.retain(|g| !g.is_empty());
    }
}

/// Where a pane sits in the docked arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub area: DockArea,
    pub group: usize,
    pub tab: usize,
}

/// Complete docked arrangement of the host window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockLayout {
    pub left: DockSlot,
    pub right: DockSlot,
    pub top: DockSlot,
    pub bottom: DockSlot,
}

impl Default for DockLayout {
    fn default() -> Self {
        Self {
            left: DockSlot::new(DockArea::Left),
            right: DockSlot::new(DockArea::Right),
            top: DockSlot::new(DockArea::Top),
            bottom: DockSlot::new(DockArea::Bottom),
        }
    }
}

impl DockLayout {
    /// Get dock slot by area
    pub fn slot(&self, area: DockArea) -> &DockSlot {
        match area {
            DockArea::Left => &self.left,
            DockArea::Right => &self.right,
            DockArea::Top => &self.top,
            DockArea::Bottom => &self.bottom,
        }
    }

    pub fn slot_mut(&mut self, area: DockArea) -> &mut DockSlot {
        match area {
            DockArea::Left => &mut self.left,
            DockArea::Right => &mut self.right,
            DockArea::Top => &mut self.top,
            DockArea::Bottom => &mut self.bottom,
        }
    }

    /// Find where a pane is docked
    pub fn find(&self, id: &PluginId) -> Option<Placement> {
        DockArea::ALL.into_iter().find_map(|area| {
            self.slot(area)
                .groups
                .iter()
                .enumerate()
                .find_map(|(group, g)| {
                    g.plugin_ids
                        .iter()
                        .position(|p| p == id)
                        .map(|tab| Placement { area, group, tab })
                })
        })
    }

    pub fn contains(&self, id: &PluginId) -> bool {
        self.find(id).is_some()
    }

    /// Place `id` in a new tab group at the end of `area`
    pub fn place(&mut self, id: PluginId, area: DockArea) {
        if self.contains(&id) {
            return;
        }
        self.slot_mut(area).groups.push(TabGroup::new(id));
    }

    /// Move `second` into the tab group of `first`
    ///
    /// Returns false when `first` is not docked.
    pub fn tabify(&mut self, first: &PluginId, second: &PluginId) -> bool {
        if first == second {
            return false;
        }
        let Some(target) = self.find(first) else {
            return false;
        };
        if let Some(current) = self.find(second) {
            if current.area == target.area && current.group == target.group {
                return true;
            }
        }

        self.remove(second);
        // Removing may have pruned a group in front of the target
        let Some(target) = self.find(first) else {
            return false;
        };
        self.slot_mut(target.area).groups[target.group].push(second.clone());
        true
    }

    /// Raise the tab of `id` within its group
    pub fn activate(&mut self, id: &PluginId) -> bool {
        match self.find(id) {
            Some(p) => self.slot_mut(p.area).groups[p.group].activate(id),
            None => false,
        }
    }

    /// Remove `id` from its group, dropping the group if it becomes empty
    pub fn remove(&mut self, id: &PluginId) -> Option<Placement> {
        let placement = self.find(id)?;
        let slot = self.slot_mut(placement.area);
        slot.groups[placement.group].remove(id);
        slot.prune();
        Some(placement)
    }

    /// Group containing `id`
    pub fn group_of(&self, id: &PluginId) -> Option<&TabGroup> {
        self.find(id)
            .map(|p| &self.slot(p.area).groups[p.group])
    }

    /// All docked ids in area, group and tab order
    pub fn plugin_ids(&self) -> impl Iterator<Item = &PluginId> {
        DockArea::ALL.into_iter().flat_map(move |area| {
            self.slot(area)
                .groups
                .iter()
                .flat_map(|g| g.plugin_ids.iter())
        })
    }

    /// Drop every placement, keeping slot sizes
    pub fn clear(&mut self) {
        for area in DockArea::ALL {
            self.slot_mut(area).groups.clear();
        }
    }

    /// Keep only the panes for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&PluginId) -> bool) {
        let doomed: Vec<PluginId> = self.plugin_ids().filter(|id| !keep(id)).cloned().collect();
        for id in doomed {
            self.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PluginId {
        PluginId::from(s)
    }

    #[test]
    fn test_place_and_find() {
        let mut layout = DockLayout::default();
        layout.place(id("editor"), DockArea::Left);
        layout.place(id("help"), DockArea::Right);
        layout.place(id("plots"), DockArea::Right);

        assert_eq!(
            layout.find(&id("plots")),
            Some(Placement {
                area: DockArea::Right,
                group: 1,
                tab: 0
            })
        );
        assert_eq!(layout.find(&id("console")), None);
    }

    #[test]
    fn test_place_twice_is_noop() {
        let mut layout = DockLayout::default();
        layout.place(id("editor"), DockArea::Left);
        layout.place(id("editor"), DockArea::Right);
        assert_eq!(layout.find(&id("editor")).map(|p| p.area), Some(DockArea::Left));
    }

    #[test]
    fn test_tabify_moves_into_group() {
        let mut layout = DockLayout::default();
        layout.place(id("help"), DockArea::Right);
        layout.place(id("plots"), DockArea::Bottom);
        assert!(layout.tabify(&id("help"), &id("plots")));

        let group = layout.group_of(&id("help")).unwrap();
        assert_eq!(group.plugin_ids, vec![id("help"), id("plots")]);
        assert!(!layout.bottom.has_panes());
    }

    #[test]
    fn test_tabify_after_pruned_group() {
        let mut layout = DockLayout::default();
        layout.place(id("a"), DockArea::Right);
        layout.place(id("b"), DockArea::Right);
        // Moving "a" into b's group prunes group 0 and shifts b's index
        assert!(layout.tabify(&id("b"), &id("a")));
        assert_eq!(layout.right.groups.len(), 1);
        assert_eq!(layout.right.groups[0].plugin_ids, vec![id("b"), id("a")]);
    }

    #[test]
    fn test_group_remove_keeps_active() {
        let mut group = TabGroup::new(id("a"));
        group.push(id("b"));
        group.push(id("c"));
        group.activate(&id("c"));

        group.remove(&id("a"));
        assert_eq!(group.active(), Some(&id("c")));

        group.remove(&id("c"));
        assert_eq!(group.active(), Some(&id("b")));

        group.remove(&id("b"));
        assert_eq!(group.active(), None);
    }
}
