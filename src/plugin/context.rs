//! Explicit context objects handed to the registry and to plugin callbacks
//!
//! Nothing in the runtime is a global: the host window lends its frame,
//! layout engine and UI registries to the plugin registry for the duration
//! of a call, and the registry lends them on to callbacks.

use super::api::Plugin;
use super::descriptor::PluginId;
use super::registry::PluginRegistry;
use crate::actions::UiRegistry;
use crate::container::DockableContainer;
use crate::error::Result;
use crate::host::DockFrame;
use crate::layout::LayoutEngine;
use crate::messages::Msg;
use crate::worker::{TaskContext, TaskOutput, TaskPool};

/// Host-owned services borrowed by the plugin registry
pub struct HostServices<'a> {
    pub frame: &'a mut DockFrame,
    pub layout: &'a mut LayoutEngine,
    pub ui: &'a mut UiRegistry,
    /// Messages posted by callbacks, processed after the callback returns
    pub outbox: &'a mut Vec<Msg>,
    pub tasks: &'a mut TaskPool,
    pub show_empty_state: bool,
    /// Default lifetime of status bar messages
    pub status_timeout_ms: u64,
}

/// What a plugin callback may touch
///
/// The plugin whose callback is running is temporarily out of the registry.
/// `get_plugin` still finds its container; its widget is the callback's own
/// `&mut self` and is not reachable through `widget`.
pub struct PluginContext<'a> {
    plugins: &'a PluginRegistry,
    /// Plugin whose callback is running
    plugin: &'a PluginId,
    /// Container of `plugin`, lent out together with it
    own: Option<&'a DockableContainer>,
    pub frame: &'a mut DockFrame,
    pub layout: &'a mut LayoutEngine,
    pub ui: &'a mut UiRegistry,
    outbox: &'a mut Vec<Msg>,
    tasks: &'a mut TaskPool,
    status_timeout_ms: u64,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(
        plugins: &'a PluginRegistry,
        plugin: &'a PluginId,
        services: &'a mut HostServices<'_>,
    ) -> Self {
        Self {
            plugins,
            plugin,
            own: None,
            frame: &mut *services.frame,
            layout: &mut *services.layout,
            ui: &mut *services.ui,
            outbox: &mut *services.outbox,
            tasks: &mut *services.tasks,
            status_timeout_ms: services.status_timeout_ms,
        }
    }

    /// Reborrow for one callback, exposing the running plugin's container
    pub(crate) fn with_own<'b>(&'b mut self, own: &'b DockableContainer) -> PluginContext<'b> {
        PluginContext {
            plugins: self.plugins,
            plugin: self.plugin,
            own: Some(own),
            frame: &mut *self.frame,
            layout: &mut *self.layout,
            ui: &mut *self.ui,
            outbox: &mut *self.outbox,
            tasks: &mut *self.tasks,
            status_timeout_ms: self.status_timeout_ms,
        }
    }

    pub fn plugin_id(&self) -> &PluginId {
        self.plugin
    }

    /// Container of a ready plugin, the running plugin included
    pub fn get_plugin(&self, id: &PluginId) -> Result<&DockableContainer> {
        match self.own {
            Some(own) if id == self.plugin => Ok(own),
            _ => self.plugins.get_plugin(id),
        }
    }

    /// The plugin widget itself, downcast to its concrete type
    ///
    /// Fails with `NotReady` for the running plugin.
    pub fn widget<P: Plugin>(&self, id: &PluginId) -> Result<&P> {
        self.plugins.widget::<P>(id)
    }

    pub fn is_available(&self, id: &PluginId) -> bool {
        self.plugins.is_available(id)
    }

    /// Queue a message for the host's update loop
    pub fn post(&mut self, msg: Msg) {
        self.outbox.push(msg);
    }

    /// Show `text` in the status bar for the configured time
    pub fn show_status_message(&mut self, text: impl Into<String>) {
        self.frame.show_status_message(text, self.status_timeout_ms);
    }

    /// Run `task` on a worker thread; its events come back through
    /// `Plugin::on_task_event`
    pub fn spawn_task<F>(&mut self, name: &str, task: F) -> Result<()>
    where
        F: FnOnce(&TaskContext<TaskOutput>) -> Result<TaskOutput> + Send + 'static,
    {
        self.tasks.spawn(self.plugin, name, task)
    }

    pub fn cancel_task(&mut self, name: &str) -> bool {
        self.tasks.cancel(self.plugin, name)
    }
}
