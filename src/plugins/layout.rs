//! Layout plugin: the panes menu and layout commands
//!
//! Waits for every other plugin, collects their "switch to" actions into the
//! panes menu and offers maximize, lock and preset actions. Everything it
//! does to the arrangement goes through posted messages.

use std::rc::Rc;

use crate::actions::{Action, Context, Menu};
use crate::container::{toggle_view_action_id, MAIN_WIDGET_CONTEXT};
use crate::layout::Preset;
use crate::messages::{LayoutMsg, Msg, PaneMsg};
use crate::plugin::{Dependency, Listeners, PaneSetup, Plugin, PluginContext, PluginId};

pub const MAXIMIZE_CURRENT_PANE: &str = "maximize_current_pane";
pub const LOCK_PANES: &str = "lock_panes";
pub const DEFAULT_LAYOUT: &str = "default_layout";
pub const SAVE_CURRENT_LAYOUT: &str = "save_current_layout";

pub const PANES_MENU: &str = "panes_menu";
pub const LAYOUTS_MENU: &str = "layouts_menu";

const PANES_SECTION: &str = "panes";

/// Id of the action applying `preset`
pub fn preset_action_id(preset: Preset) -> String {
    format!("layout_{}", preset.key())
}

#[derive(Debug, Default)]
pub struct LayoutPlugin {
    panes_menu: Option<Rc<Menu>>,
    lock_action: Option<Rc<Action>>,
    /// Plugins listed in the panes menu, in availability order
    panes: Vec<PluginId>,
    saved_layouts: usize,
}

impl LayoutPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panes(&self) -> &[PluginId] {
        &self.panes
    }

    fn on_plugin_available(&mut self, target: &PluginId, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        if let Some(lock) = &self.lock_action {
            lock.set_checked(cx.layout.is_locked());
        }

        let toggle = match cx.ui.actions.get(
            &toggle_view_action_id(target),
            target,
            Context::named(MAIN_WIDGET_CONTEXT),
        ) {
            Ok(action) => action,
            // Not dockable: nothing to list
            Err(_) => return Ok(()),
        };

        if let Some(menu) = &self.panes_menu {
            menu.add_action(&toggle, PANES_SECTION);
        }
        self.panes.push(target.clone());
        Ok(())
    }

    fn on_plugin_teardown(&mut self, target: &PluginId, _cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.panes.retain(|id| id != target);
        Ok(())
    }

    fn maximize_current(&self, cx: &mut PluginContext<'_>) {
        let target = cx
            .layout
            .maximized()
            .or_else(|| cx.frame.focus())
            .cloned();
        match target {
            Some(id) => cx.post(Msg::Pane(PaneMsg::ToggleMaximize(id))),
            None => cx.show_status_message("No pane has focus"),
        }
    }
}

impl Plugin for LayoutPlugin {
    fn title(&self) -> String {
        "Layout".to_string()
    }

    fn setup(&mut self, pane: &mut PaneSetup<'_>) -> anyhow::Result<()> {
        pane.create_action(MAXIMIZE_CURRENT_PANE, "Maximize current pane", "_");
        self.lock_action = Some(pane.create_checkable_action(LOCK_PANES, "Lock panes and toolbars", "_", true));
        pane.create_action(SAVE_CURRENT_LAYOUT, "Save current layout", "_");

        let layouts = pane.create_menu(LAYOUTS_MENU, "Window layouts")?;
        let default = pane.create_action(DEFAULT_LAYOUT, "Reset to default layout", "_");
        layouts.add_action(&default, "reset");
        for preset in Preset::ALL {
            let action = pane.create_action(&preset_action_id(preset), preset.name(), "_");
            layouts.add_action(&action, "presets");
        }

        self.panes_menu = Some(pane.create_menu(PANES_MENU, "Panes")?);
        Ok(())
    }

    fn on_action(&mut self, action: &str, checked: bool, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        match action {
            MAXIMIZE_CURRENT_PANE => self.maximize_current(cx),
            LOCK_PANES => cx.post(Msg::Layout(LayoutMsg::LockAll(checked))),
            DEFAULT_LAYOUT => cx.post(Msg::Layout(LayoutMsg::ApplyPreset(
                Preset::Default.key().to_string(),
            ))),
            SAVE_CURRENT_LAYOUT => {
                self.saved_layouts += 1;
                let name = format!("Custom layout {}", self.saved_layouts);
                cx.show_status_message(format!("Saved \"{}\"", name));
                cx.post(Msg::Layout(LayoutMsg::SaveCustom(name)));
            }
            other => {
                let preset = Preset::ALL
                    .into_iter()
                    .find(|p| preset_action_id(*p) == other)
                    .ok_or_else(|| anyhow::anyhow!("unknown layout action '{}'", other))?;
                cx.post(Msg::Layout(LayoutMsg::ApplyPreset(preset.key().to_string())));
            }
        }
        Ok(())
    }

    fn listeners() -> Listeners<Self> {
        Listeners::new()
            .on_available(Dependency::All, "on_plugin_available", LayoutPlugin::on_plugin_available)
            .on_teardown(Dependency::All, "on_plugin_teardown", LayoutPlugin::on_plugin_teardown)
    }
}
