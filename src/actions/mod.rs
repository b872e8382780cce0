//! Action, tool button, toolbar and menu registries
//!
//! Plugins reach each other's UI commands by `(plugin, context, id)` through
//! a `UiRegistry` handed to them explicitly; there is no global instance.

mod item;
mod registry;

pub use item::{Action, Menu, MenuItem, ToolButton, BOTTOM_SECTION};
pub use registry::{Collision, Context, Owner, ReferenceRegistry};

use crate::container::Toolbar;
use crate::error::Result;
use crate::messages::Msg;
use crate::plugin::PluginId;

/// The four reference registries, one per kind of UI object
pub struct UiRegistry {
    pub actions: ReferenceRegistry<Action>,
    pub tool_buttons: ReferenceRegistry<ToolButton>,
    pub toolbars: ReferenceRegistry<Toolbar>,
    pub menus: ReferenceRegistry<Menu>,
}

impl Default for UiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRegistry {
    pub fn new() -> Self {
        Self {
            actions: ReferenceRegistry::new("action"),
            tool_buttons: ReferenceRegistry::new("tool button"),
            toolbars: ReferenceRegistry::new("toolbar"),
            menus: ReferenceRegistry::new("menu"),
        }
    }

    /// Look up an action and trigger it
    ///
    /// `Ok(None)` means the action exists but is disabled.
    pub fn trigger(
        &self,
        id: &str,
        owner: impl Into<Owner>,
        context: impl Into<Context>,
    ) -> Result<Option<Msg>> {
        let action = self.actions.get(id, owner, context)?;
        Ok(action.trigger())
    }

    /// Forget everything registered by one plugin
    pub fn remove_plugin(&mut self, id: &PluginId) {
        let owner = Owner::from(id);
        self.actions.remove_owner(&owner);
        self.tool_buttons.remove_owner(&owner);
        self.toolbars.remove_owner(&owner);
        self.menus.remove_owner(&owner);
    }

    /// Drop dead entries from all four registries
    pub fn purge_dead(&mut self) -> usize {
        self.actions.purge_dead()
            + self.tool_buttons.purge_dead()
            + self.toolbars.purge_dead()
            + self.menus.purge_dead()
    }

    /// Clear all four registries
    pub fn reset(&mut self) {
        self.actions.reset();
        self.tool_buttons.reset();
        self.toolbars.reset();
        self.menus.reset();
    }
}
