//! The contract every hosted plugin implements
//!
//! A plugin is the widget that lives inside a `DockableContainer`. The
//! runtime owns the container; the plugin supplies title, icon, actions and
//! reactions to other plugins becoming available.

use std::rc::Rc;

use super::context::PluginContext;
use super::observer::Listeners;
use crate::actions::{Action, Context, Menu, UiRegistry};
use crate::container::{DockableContainer, Toolbar, ToolbarItem};
use crate::error::Result;
use crate::worker::{TaskEvent, TaskOutput};

/// A plugin's container widget
///
/// Only `title` is mandatory. Listener declarations go in `listeners()`,
/// which is an associated function so the registry can read it before the
/// plugin exists.
pub trait Plugin: 'static {
    /// Title shown on the dock tab or the floating window
    fn title(&self) -> String;

    fn icon(&self) -> String {
        String::new()
    }

    /// Create actions, menus and toolbar items
    fn setup(&mut self, _pane: &mut PaneSetup<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Refresh enabled/checked state of the plugin's own actions
    fn update_actions(&mut self, _container: &DockableContainer) {}

    /// Whether the plugin agrees to be closed
    fn can_close(&self) -> bool {
        true
    }

    fn on_close(&mut self, _cancelable: bool) {}

    fn on_focus_in(&mut self) {}

    fn on_focus_out(&mut self) {}

    /// Id of the child that should receive keyboard focus
    fn focus_widget(&self) -> Option<String> {
        None
    }

    /// Raise and focus whenever the pane is revealed
    fn raise_and_focus(&self) -> bool {
        false
    }

    /// Message for the empty-state overlay
    fn empty_message(&self) -> Option<String> {
        None
    }

    /// Whether the content area currently has something to display
    fn has_content(&self) -> bool {
        true
    }

    /// A plugin-defined action was triggered
    fn on_action(
        &mut self,
        _action: &str,
        _checked: bool,
        _cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// A background task started by this plugin reported back
    fn on_task_event(
        &mut self,
        _task: &str,
        _event: TaskEvent<TaskOutput>,
        _cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn listeners() -> Listeners<Self>
    where
        Self: Sized,
    {
        Listeners::new()
    }
}

/// Handle given to `Plugin::setup`
pub struct PaneSetup<'a> {
    pub container: &'a mut DockableContainer,
    pub ui: &'a mut UiRegistry,
}

impl<'a> PaneSetup<'a> {
    /// Create an action that routes back to `Plugin::on_action`
    #[track_caller]
    pub fn create_action(
        &mut self,
        id: &str,
        text: &str,
        context: impl Into<Context>,
    ) -> Rc<Action> {
        self.container.create_action(self.ui, id, text, context)
    }

    #[track_caller]
    pub fn create_checkable_action(
        &mut self,
        id: &str,
        text: &str,
        context: impl Into<Context>,
        checked: bool,
    ) -> Rc<Action> {
        self.container
            .create_checkable_action(self.ui, id, text, context, checked)
    }

    #[track_caller]
    pub fn create_toolbar(&mut self, id: &str) -> Result<Rc<Toolbar>> {
        self.container.create_toolbar(self.ui, id)
    }

    #[track_caller]
    pub fn create_menu(&mut self, id: &str, title: &str) -> Result<Rc<Menu>> {
        self.container.create_menu(self.ui, id, title)
    }

    pub fn add_item_to_toolbar(
        &mut self,
        item: ToolbarItem,
        toolbar: &str,
        section: Option<&str>,
        before: Option<&str>,
    ) -> Result<()> {
        self.container.add_item_to_toolbar(item, toolbar, section, before)
    }

    pub fn add_to_options_menu(&mut self, action: &Rc<Action>, section: &str) {
        self.container.options_menu().add_action(action, section);
    }
}
