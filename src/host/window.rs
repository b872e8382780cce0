//! The host window
//!
//! `HostWindow` owns every runtime service (frame, layout engine, UI
//! registries, plugin registry, shortcut map, workers) and is the only thing
//! that mutates them. Everything else borrows them for the length of one
//! call.

use crate::actions::{Context, Owner, UiRegistry};
use crate::commands::Cmd;
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::layout::{LayoutEngine, LayoutSnapshot, LayoutStore, LoadOutcome, Preset, ReadySet};
use crate::messages::Msg;
use crate::plugin::{HostServices, PluginDescriptor, PluginId, PluginRegistry};
use crate::shortcuts::{Keystroke, ShortcutMap};
use crate::update::update;
use crate::worker::{TaskEvent, TaskOutput, TaskPool};

use super::frame::DockFrame;

/// Rounds of posted messages processed per dispatch before giving up
const MAX_OUTBOX_ROUNDS: usize = 32;

pub struct HostWindow {
    pub frame: DockFrame,
    pub layout: LayoutEngine,
    pub ui: UiRegistry,
    pub plugins: PluginRegistry,
    pub shortcuts: ShortcutMap,
    pub config: RuntimeConfig,
    pub tasks: TaskPool,
    store: Option<LayoutStore>,
    /// Messages posted by plugin callbacks, not yet processed
    outbox: Vec<Msg>,
}

impl HostWindow {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            frame: DockFrame::default(),
            layout: LayoutEngine::new(),
            ui: UiRegistry::new(),
            plugins: PluginRegistry::new(),
            shortcuts: ShortcutMap::new(),
            config,
            tasks: TaskPool::new(),
            store: None,
            outbox: Vec::new(),
        }
    }

    /// Persist the layout through `store`
    pub fn with_store(mut self, store: LayoutStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_shortcuts(mut self, shortcuts: ShortcutMap) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn store(&self) -> Option<&LayoutStore> {
        self.store.as_ref()
    }

    pub fn register(&mut self, descriptor: PluginDescriptor) -> Result<()> {
        self.plugins.register_descriptor(descriptor)
    }

    /// Split the host into the plugin registry and the services it borrows
    pub fn services(&mut self) -> (&mut PluginRegistry, HostServices<'_>) {
        let show_empty_state = self.config.show_empty_state;
        let status_timeout_ms = self.config.status_timeout_ms;
        (
            &mut self.plugins,
            HostServices {
                frame: &mut self.frame,
                layout: &mut self.layout,
                ui: &mut self.ui,
                outbox: &mut self.outbox,
                tasks: &mut self.tasks,
                show_empty_state,
                status_timeout_ms,
            },
        )
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Start every plugin and apply the initial layout
    ///
    /// Fatal registry errors (cycles, missing required dependencies) are
    /// returned; anything else is logged.
    pub fn start(&mut self) -> Result<()> {
        let disabled: Vec<PluginId> = self.config.disabled_plugins.iter().cloned().collect();
        for id in &disabled {
            self.plugins.set_plugin_enabled(id, false);
        }

        self.layout.set_locked(self.config.lock_panes);
        let saved = self.load_saved_layout();

        self.frame.set_setting_up(true);
        let started = {
            let (plugins, mut services) = self.services();
            plugins.start(&mut services)
        };
        if let Err(e) = started {
            self.frame.set_setting_up(false);
            return Err(e);
        }

        self.apply_initial_layout(saved);
        self.frame.set_setting_up(false);

        let applied = self.shortcuts.apply_to_actions(&self.ui);
        tracing::debug!(applied, "applied shortcuts to actions");
        tracing::info!(
            ready = self.plugins.ready_plugins().len(),
            "host window started"
        );

        let cmd = self.drain_outbox();
        self.perform(cmd);
        Ok(())
    }

    /// Read the layout file, returning the snapshot to restore if any
    fn load_saved_layout(&mut self) -> Option<LayoutSnapshot> {
        let store = self.store.as_ref()?;
        match store.load() {
            Ok(LoadOutcome::Loaded(file)) => {
                let snapshot = self.layout.load_file(file);
                if self.config.restore_layout {
                    snapshot
                } else {
                    tracing::info!("Not restoring the saved layout");
                    self.layout.set_locked(self.config.lock_panes);
                    None
                }
            }
            Ok(LoadOutcome::VersionMismatch { found }) => {
                tracing::info!(found, "Saved layout is from another version, using a preset");
                None
            }
            Ok(LoadOutcome::Missing) => None,
            Err(e) => {
                tracing::warn!("Failed to load layout: {}", e);
                None
            }
        }
    }

    fn apply_initial_layout(&mut self, saved: Option<LayoutSnapshot>) {
        let ready = self.plugins.ready_panes();
        let restored = match saved {
            Some(snapshot) => self.layout.restore(&snapshot, &mut self.frame, &ready),
            None => false,
        };
        if !restored {
            self.apply_default_preset(&ready);
        }

        self.plugins.lock_all(self.layout.is_locked(), &mut self.layout);
        self.sync_panes();
    }

    fn apply_default_preset(&mut self, ready: &ReadySet) {
        let name = self.config.default_layout.clone();
        if let Err(e) = self
            .layout
            .apply_preset_by_name(&name, &mut self.frame, ready)
        {
            tracing::warn!("{}, using the default layout", e);
            self.layout.apply_preset(Preset::Default, &mut self.frame, ready);
        }
    }

    /// Mirror frame state onto every container's actions
    pub fn sync_panes(&mut self) {
        self.plugins.refresh_all();
        self.plugins.sync_maximized(&self.layout);
        for id in self.plugins.ready_plugins() {
            if !self.frame.has_dock_widget(&id) {
                continue;
            }
            let visible = self.frame.is_visible(&id);
            let floating = self.frame.is_floating(&id);
            if let Ok(container) = self.plugins.container_mut(&id) {
                container.set_visible_state(visible);
                container.sync_dock_actions(floating, visible);
            }
        }
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Process one message and everything plugins post in response
    pub fn dispatch(&mut self, msg: Msg) -> Option<Cmd> {
        let cmd = update(self, msg);
        let cmd = Cmd::merge(cmd, self.drain_outbox());
        self.perform(cmd.clone());
        cmd
    }

    /// Look an action up and run the message it emits
    ///
    /// `Ok(None)` when the action exists but is disabled.
    pub fn trigger_action(
        &mut self,
        id: &str,
        owner: impl Into<Owner>,
        context: impl Into<Context>,
    ) -> Result<Option<Cmd>> {
        match self.ui.trigger(id, owner, context)? {
            Some(msg) => Ok(self.dispatch(msg)),
            None => Ok(None),
        }
    }

    pub fn handle_key(&mut self, keystroke: Keystroke) -> Option<Cmd> {
        self.dispatch(Msg::Key(keystroke))
    }

    fn drain_outbox(&mut self) -> Option<Cmd> {
        let mut cmd = None;
        let mut rounds = 0;
        while !self.outbox.is_empty() {
            rounds += 1;
            if rounds > MAX_OUTBOX_ROUNDS {
                tracing::warn!(
                    dropped = self.outbox.len(),
                    "plugins keep posting messages, dropping the rest"
                );
                self.outbox.clear();
                break;
            }
            for msg in std::mem::take(&mut self.outbox) {
                cmd = Cmd::merge(cmd, update(self, msg));
            }
        }
        cmd
    }

    fn perform(&mut self, cmd: Option<Cmd>) {
        let Some(cmd) = cmd else {
            return;
        };
        if cmd.needs_redraw() {
            self.sync_panes();
        }
        if cmd.needs_persist() {
            if let Err(e) = self.persist() {
                tracing::error!("Failed to save layout: {}", e);
            }
        }
    }

    /// Deliver pending worker events to their plugins without blocking
    pub fn pump_tasks(&mut self) -> Option<Cmd> {
        let events = self.tasks.poll();
        self.deliver_task_events(events)
    }

    /// Block until every running task finished and deliver its events
    pub fn finish_tasks(&mut self) -> Option<Cmd> {
        let events = self.tasks.wait_all();
        self.deliver_task_events(events)
    }

    fn deliver_task_events(
        &mut self,
        events: Vec<(PluginId, String, TaskEvent<TaskOutput>)>,
    ) -> Option<Cmd> {
        if events.is_empty() {
            return None;
        }
        for (plugin, task, event) in events {
            let (plugins, mut services) = self.services();
            if let Err(e) = plugins.dispatch_task_event(&plugin, &task, event, &mut services) {
                tracing::debug!(plugin = %plugin, task, "dropping task event: {}", e);
            }
        }
        let cmd = Cmd::merge(Some(Cmd::Redraw), self.drain_outbox());
        self.perform(cmd.clone());
        cmd
    }

    // ========================================================================
    // Persistence and shutdown
    // ========================================================================

    /// Write the current layout to the store, if there is one
    pub fn persist(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(&self.layout.to_file(&self.frame))
    }

    /// Save the layout and tear every plugin down
    ///
    /// Unless `close_immediately`, a plugin refusing to close cancels the
    /// shutdown and `false` is returned.
    pub fn shutdown(&mut self, close_immediately: bool) -> bool {
        if !close_immediately {
            let refusing = self
                .plugins
                .ready_plugins()
                .into_iter()
                .find(|id| !self.plugins.can_delete_plugin(id));
            if let Some(id) = refusing {
                tracing::info!(plugin = %id, "plugin refused to close, shutdown cancelled");
                return false;
            }
        }

        if let Err(e) = self.persist() {
            tracing::error!("Failed to save layout: {}", e);
        }
        self.tasks.cancel_all();

        let (plugins, mut services) = self.services();
        plugins.delete_all_plugins(&[], true, &mut services);
        tracing::info!("host window shut down");
        true
    }
}
