//! Type-erased plugin slot
//!
//! `Hosted<P>` pairs a plugin with its container and its observer table so
//! the registry can store heterogeneous plugins behind one trait object
//! without downcasting on dispatch.

use std::any::Any;

use super::api::{PaneSetup, Plugin};
use super::context::PluginContext;
use super::descriptor::PluginId;
use super::observer::ObserverMixin;
use crate::actions::UiRegistry;
use crate::container::DockableContainer;
use crate::worker::{TaskEvent, TaskOutput};

pub(crate) trait HostedPlugin {
    fn container(&self) -> &DockableContainer;
    fn container_mut(&mut self) -> &mut DockableContainer;
    fn widget(&self) -> &dyn Any;
    fn widget_mut(&mut self) -> &mut dyn Any;

    fn setup(&mut self, ui: &mut UiRegistry, show_empty_state: bool) -> anyhow::Result<()>;
    /// Re-read plugin state into the container
    fn refresh(&mut self);

    fn listens_to(&self, target: &PluginId) -> bool;
    fn listens_to_teardown(&self, target: &PluginId) -> bool;
    fn notify_available(&mut self, target: &PluginId, cx: &mut PluginContext<'_>) -> usize;
    fn notify_teardown(&mut self, target: &PluginId, cx: &mut PluginContext<'_>) -> usize;

    fn can_close(&self) -> bool;
    fn close(&mut self, cancelable: bool);
    fn focus_in(&mut self);
    fn focus_out(&mut self);

    fn on_action(
        &mut self,
        action: &str,
        checked: bool,
        cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()>;
    fn on_task_event(
        &mut self,
        task: &str,
        event: TaskEvent<TaskOutput>,
        cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()>;
}

pub(crate) struct Hosted<P: Plugin> {
    container: DockableContainer,
    widget: P,
    observer: ObserverMixin<P>,
}

impl<P: Plugin> Hosted<P> {
    pub fn new(container: DockableContainer, widget: P, observer: ObserverMixin<P>) -> Self {
        Self {
            container,
            widget,
            observer,
        }
    }
}

impl<P: Plugin> HostedPlugin for Hosted<P> {
    fn container(&self) -> &DockableContainer {
        &self.container
    }

    fn container_mut(&mut self) -> &mut DockableContainer {
        &mut self.container
    }

    fn widget(&self) -> &dyn Any {
        &self.widget
    }

    fn widget_mut(&mut self) -> &mut dyn Any {
        &mut self.widget
    }

    fn setup(&mut self, ui: &mut UiRegistry, show_empty_state: bool) -> anyhow::Result<()> {
        if !self.container.setup(ui) {
            return Ok(());
        }

        self.container
            .configure_empty_state(self.widget.empty_message(), show_empty_state);
        self.container
            .set_raise_and_focus(self.widget.raise_and_focus());
        self.container.set_focus_widget(self.widget.focus_widget());

        let mut pane = PaneSetup {
            container: &mut self.container,
            ui,
        };
        self.widget.setup(&mut pane)?;

        self.container.render_toolbars();
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.widget.update_actions(&self.container);
        self.container.set_content_present(self.widget.has_content());
    }

    fn listens_to(&self, target: &PluginId) -> bool {
        self.observer.listens_to(target)
    }

    fn listens_to_teardown(&self, target: &PluginId) -> bool {
        self.observer.listens_to_teardown(target)
    }

    fn notify_available(&mut self, target: &PluginId, cx: &mut PluginContext<'_>) -> usize {
        let mut cx = cx.with_own(&self.container);
        let failures = self
            .observer
            .on_plugin_available(&mut self.widget, target, &mut cx);
        self.refresh();
        failures
    }

    fn notify_teardown(&mut self, target: &PluginId, cx: &mut PluginContext<'_>) -> usize {
        let mut cx = cx.with_own(&self.container);
        let failures = self
            .observer
            .on_plugin_teardown(&mut self.widget, target, &mut cx);
        self.refresh();
        failures
    }

    fn can_close(&self) -> bool {
        self.widget.can_close()
    }

    fn close(&mut self, cancelable: bool) {
        self.widget.on_close(cancelable);
    }

    fn focus_in(&mut self) {
        self.widget.on_focus_in();
    }

    fn focus_out(&mut self) {
        self.widget.on_focus_out();
    }

    fn on_action(
        &mut self,
        action: &str,
        checked: bool,
        cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()> {
        let result = self
            .widget
            .on_action(action, checked, &mut cx.with_own(&self.container));
        self.refresh();
        result
    }

    fn on_task_event(
        &mut self,
        task: &str,
        event: TaskEvent<TaskOutput>,
        cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()> {
        let result = self
            .widget
            .on_task_event(task, event, &mut cx.with_own(&self.container));
        self.refresh();
        result
    }
}
