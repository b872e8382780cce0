//! Plugin registry and availability graph
//!
//! Owns every descriptor and `PluginState`, drives startup in activation
//! order and teardown in reverse, and delivers availability and teardown
//! events to observers. Host services (frame, layout engine, UI registries)
//! are lent to each call through `HostServices`.

use std::collections::{BTreeMap, BTreeSet};

use super::api::Plugin;
use super::context::{HostServices, PluginContext};
use super::descriptor::{PluginDescriptor, PluginId};
use super::hosted::HostedPlugin;
use super::order::activation_order;
use super::state::{LifecycleEvent, PluginState, PluginStatus};
use crate::container::{DockableContainer, Pane};
use crate::error::{Result, RuntimeError};
use crate::host::DockFrame;
use crate::layout::{LayoutEngine, ReadyPane, ReadySet};
use crate::worker::{TaskEvent, TaskOutput};

#[derive(Default)]
pub struct PluginRegistry {
    descriptors: BTreeMap<PluginId, PluginDescriptor>,
    states: BTreeMap<PluginId, PluginState>,
    order: Vec<PluginId>,
    started: bool,
    ready_counter: u64,
    disabled: BTreeSet<PluginId>,
    events: Vec<LifecycleEvent>,
    /// `(plugin, dependency)` pairs already warned about
    warned_optional: BTreeSet<(PluginId, PluginId)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Add a descriptor; nothing is constructed until `start`
    pub fn register_descriptor(&mut self, descriptor: PluginDescriptor) -> Result<()> {
        if self.started {
            return Err(RuntimeError::invariant(format!(
                "cannot register {} after startup",
                descriptor.id
            )));
        }
        if self.descriptors.contains_key(&descriptor.id) {
            return Err(RuntimeError::DuplicatePlugin(descriptor.id.clone()));
        }
        descriptor.validate()?;

        tracing::debug!(plugin = %descriptor.id, "registered plugin descriptor");
        self.states.insert(descriptor.id.clone(), PluginState::new());
        self.descriptors.insert(descriptor.id.clone(), descriptor);
        Ok(())
    }

    pub fn descriptor(&self, id: &PluginId) -> Option<&PluginDescriptor> {
        self.descriptors.get(id)
    }

    pub fn plugin_ids(&self) -> impl Iterator<Item = &PluginId> {
        self.descriptors.keys()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Disabled plugins are never constructed; takes effect at `start`
    pub fn set_plugin_enabled(&mut self, id: &PluginId, enabled: bool) {
        if self.started {
            tracing::info!(plugin = %id, enabled, "plugin enable state changes at next start");
        }
        if enabled {
            self.disabled.remove(id);
        } else {
            self.disabled.insert(id.clone());
        }
    }

    pub fn is_plugin_enabled(&self, id: &PluginId) -> bool {
        !self.disabled.contains(id)
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Check dependencies, compute the activation order and bring every
    /// enabled plugin to `Ready`
    ///
    /// A missing required dependency or a cycle fails before anything is
    /// constructed. Calling `start` again is a no-op.
    pub fn start(&mut self, services: &mut HostServices<'_>) -> Result<()> {
        if self.started {
            return Ok(());
        }

        for descriptor in self.descriptors.values() {
            if let Some(missing) = descriptor
                .required_plugins()
                .find(|dep| !self.descriptors.contains_key(*dep))
            {
                return Err(RuntimeError::MissingDependency {
                    plugin: descriptor.id.clone(),
                    dependency: missing.clone(),
                });
            }
            for optional in descriptor.optional_plugins() {
                if self.descriptors.contains_key(optional) {
                    continue;
                }
                let key = (descriptor.id.clone(), optional.clone());
                if self.warned_optional.insert(key) {
                    tracing::warn!(
                        plugin = %descriptor.id,
                        dependency = %optional,
                        "optional dependency is not registered"
                    );
                }
            }
        }

        let order = activation_order(self.descriptors.values())?;
        let names: Vec<&str> = order.iter().map(PluginId::as_str).collect();
        tracing::info!(order = ?names, "starting plugins");
        self.order = order.clone();
        self.started = true;

        for id in &order {
            if self.disabled.contains(id) {
                tracing::info!(plugin = %id, "plugin is disabled, not starting it");
                self.advance(id, PluginStatus::Torn);
                continue;
            }
            let unavailable = self.descriptors[id]
                .required_plugins()
                .find(|dep| !self.is_available(dep))
                .cloned();
            if let Some(dep) = unavailable {
                tracing::warn!(
                    plugin = %id,
                    dependency = %dep,
                    "required dependency is not available, skipping plugin"
                );
                self.advance(id, PluginStatus::Torn);
                self.events.push(LifecycleEvent::Failed(id.clone()));
                continue;
            }
            self.instantiate(id, services);
        }
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    fn advance(&mut self, id: &PluginId, next: PluginStatus) {
        if let Some(state) = self.states.get_mut(id) {
            state.advance(id, next);
        }
    }

    /// Construct one plugin, dock it and announce it
    fn instantiate(&mut self, id: &PluginId, services: &mut HostServices<'_>) {
        self.advance(id, PluginStatus::Instantiating);

        let descriptor = &self.descriptors[id];
        let is_dockable = descriptor.is_dockable;
        let area = descriptor.area;
        let mut hosted = match descriptor.instantiate() {
            Ok(hosted) => hosted,
            Err(e) => {
                tracing::error!(plugin = %id, "plugin construction failed: {:#}", e);
                self.advance(id, PluginStatus::Torn);
                self.events.push(LifecycleEvent::Failed(id.clone()));
                return;
            }
        };
        self.events.push(LifecycleEvent::Instantiated(id.clone()));

        if let Err(e) = hosted.setup(services.ui, services.show_empty_state) {
            tracing::error!(plugin = %id, callback = "setup", "plugin setup failed: {:#}", e);
            services.ui.remove_plugin(id);
            self.advance(id, PluginStatus::Torn);
            self.events.push(LifecycleEvent::Failed(id.clone()));
            return;
        }

        if is_dockable {
            services.frame.add_dock_widget(id, area);
            hosted
                .container_mut()
                .set_title_bar_locked(services.layout.is_locked());
        }

        self.ready_counter += 1;
        let seq = self.ready_counter;
        if let Some(state) = self.states.get_mut(id) {
            state.hosted = Some(hosted);
            state.ready_seq = Some(seq);
            state.advance(id, PluginStatus::Ready);
        }
        self.events.push(LifecycleEvent::Ready(id.clone()));

        // Replay what became available before this plugin was ready
        let earlier: Vec<PluginId> = self
            .ready_in_order()
            .into_iter()
            .filter(|target| target != id && self.listens_to(id, target))
            .collect();
        for target in &earlier {
            self.deliver(id, target, Delivery::Available, services);
        }

        let observers: Vec<PluginId> = self
            .ready_in_order()
            .into_iter()
            .filter(|observer| observer != id && self.listens_to(observer, id))
            .collect();
        for observer in &observers {
            self.deliver(observer, id, Delivery::Available, services);
        }
    }

    /// Ready plugins in the order they became ready
    fn ready_in_order(&self) -> Vec<PluginId> {
        let mut ready: Vec<(u64, &PluginId)> = self
            .states
            .iter()
            .filter(|(_, s)| s.status == PluginStatus::Ready)
            .filter_map(|(id, s)| s.ready_seq.map(|seq| (seq, id)))
            .collect();
        ready.sort();
        ready.into_iter().map(|(_, id)| id.clone()).collect()
    }

    fn listens_to(&self, observer: &PluginId, target: &PluginId) -> bool {
        self.hosted(observer).is_some_and(|h| h.listens_to(target))
    }

    fn listens_to_teardown(&self, observer: &PluginId, target: &PluginId) -> bool {
        self.hosted(observer)
            .is_some_and(|h| h.listens_to_teardown(target))
    }

    /// Lend `observer` out of the registry and run one callback on it
    fn deliver(
        &mut self,
        observer: &PluginId,
        target: &PluginId,
        delivery: Delivery,
        services: &mut HostServices<'_>,
    ) {
        let Some(mut hosted) = self.states.get_mut(observer).and_then(|s| s.hosted.take()) else {
            return;
        };

        {
            let mut cx = PluginContext::new(self, observer, services);
            match delivery {
                Delivery::Available => hosted.notify_available(target, &mut cx),
                Delivery::Teardown => hosted.notify_teardown(target, &mut cx),
            };
        }

        if let Some(state) = self.states.get_mut(observer) {
            state.hosted = Some(hosted);
        }
        self.events.push(match delivery {
            Delivery::Available => LifecycleEvent::Available {
                observer: observer.clone(),
                target: target.clone(),
            },
            Delivery::Teardown => LifecycleEvent::Teardown {
                observer: observer.clone(),
                target: target.clone(),
            },
        });
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    /// Tear one plugin down; a no-op unless it is `Ready`
    pub fn shutdown(&mut self, id: &PluginId, services: &mut HostServices<'_>) {
        if self.status(id) != Some(PluginStatus::Ready) {
            return;
        }

        let observers: Vec<PluginId> = self
            .ready_in_order()
            .into_iter()
            .filter(|observer| observer != id && self.listens_to_teardown(observer, id))
            .collect();
        for observer in &observers {
            self.deliver(observer, id, Delivery::Teardown, services);
        }

        self.advance(id, PluginStatus::TearingDown);
        services.tasks.cancel_plugin(id);
        let hosted = self.states.get_mut(id).and_then(|s| s.hosted.take());
        if let Some(mut hosted) = hosted {
            hosted.close(false);
            services.layout.forget_pane(id, services.frame);
            services.frame.remove_dock_widget(id);
            services.ui.remove_plugin(id);
            hosted.container_mut().mark_closed();
        }
        self.advance(id, PluginStatus::Torn);
        self.events.push(LifecycleEvent::Torn(id.clone()));
    }

    /// Tear everything down in reverse activation order
    pub fn shutdown_all(&mut self, services: &mut HostServices<'_>) {
        let order: Vec<PluginId> = self.order.iter().rev().cloned().collect();
        for id in &order {
            self.shutdown(id, services);
        }
    }

    /// Whether `id` agrees to be closed; plugins that are not ready do
    pub fn can_delete_plugin(&self, id: &PluginId) -> bool {
        self.hosted(id).map_or(true, |h| h.can_close())
    }

    /// Close every plugin except `excluding`
    ///
    /// Unless `close_immediately`, a single plugin refusing to close cancels
    /// the whole operation and `false` is returned.
    pub fn delete_all_plugins(
        &mut self,
        excluding: &[PluginId],
        close_immediately: bool,
        services: &mut HostServices<'_>,
    ) -> bool {
        let candidates: Vec<PluginId> = self
            .order
            .iter()
            .rev()
            .filter(|id| !excluding.contains(id))
            .cloned()
            .collect();

        if !close_immediately {
            if let Some(refusing) = candidates.iter().find(|id| !self.can_delete_plugin(id)) {
                tracing::info!(plugin = %refusing, "plugin refused to close, cancelling");
                return false;
            }
        }

        self.dock_all_undocked_plugins(true, services);
        for id in &candidates {
            self.shutdown(id, services);
        }
        true
    }

    /// Dock a floating pane back, optionally remembering it was floating
    pub fn dock_undocked_plugin(
        &mut self,
        id: &PluginId,
        save_undocked: bool,
        services: &mut HostServices<'_>,
    ) {
        if !services.frame.is_floating(id) {
            return;
        }
        if let Ok(container) = self.container_mut(id) {
            Pane::new(container, services.frame, services.layout).close_window(save_undocked);
        }
    }

    pub fn dock_all_undocked_plugins(&mut self, save_undocked: bool, services: &mut HostServices<'_>) {
        let floating: Vec<PluginId> = services
            .frame
            .floating_windows()
            .map(|(id, _)| id.clone())
            .collect();
        for id in &floating {
            self.dock_undocked_plugin(id, save_undocked, services);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn status(&self, id: &PluginId) -> Option<PluginStatus> {
        self.states.get(id).map(|s| s.status)
    }

    pub fn is_available(&self, id: &PluginId) -> bool {
        self.status(id) == Some(PluginStatus::Ready)
    }

    /// Order computed by the last `start`
    pub fn activation_order(&self) -> &[PluginId] {
        &self.order
    }

    /// Journal of lifecycle events, oldest first
    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    pub fn ready_plugins(&self) -> Vec<PluginId> {
        self.ready_in_order()
    }

    fn hosted(&self, id: &PluginId) -> Option<&dyn HostedPlugin> {
        self.states
            .get(id)
            .filter(|s| s.status == PluginStatus::Ready)
            .and_then(|s| s.hosted.as_deref())
    }

    fn hosted_mut(&mut self, id: &PluginId) -> Result<&mut Box<dyn HostedPlugin>> {
        self.states
            .get_mut(id)
            .filter(|s| s.status == PluginStatus::Ready)
            .and_then(|s| s.hosted.as_mut())
            .ok_or_else(|| RuntimeError::NotReady(id.clone()))
    }

    /// Container of a ready plugin
    pub fn get_plugin(&self, id: &PluginId) -> Result<&DockableContainer> {
        self.hosted(id)
            .map(|h| h.container())
            .ok_or_else(|| RuntimeError::NotReady(id.clone()))
    }

    pub fn container_mut(&mut self, id: &PluginId) -> Result<&mut DockableContainer> {
        self.hosted_mut(id).map(|h| h.container_mut())
    }

    pub fn widget<P: Plugin>(&self, id: &PluginId) -> Result<&P> {
        let hosted = self
            .hosted(id)
            .ok_or_else(|| RuntimeError::NotReady(id.clone()))?;
        hosted.widget().downcast_ref::<P>().ok_or_else(|| {
            RuntimeError::invariant(format!(
                "plugin {} is not a {}",
                id,
                std::any::type_name::<P>()
            ))
        })
    }

    pub fn widget_mut<P: Plugin>(&mut self, id: &PluginId) -> Result<&mut P> {
        let hosted = self.hosted_mut(id)?;
        hosted.widget_mut().downcast_mut::<P>().ok_or_else(|| {
            RuntimeError::invariant(format!(
                "plugin {} is not a {}",
                id,
                std::any::type_name::<P>()
            ))
        })
    }

    /// Borrow a ready plugin's container as a pane against the frame
    pub fn pane<'a>(
        &'a mut self,
        id: &PluginId,
        frame: &'a mut DockFrame,
        layout: &'a mut LayoutEngine,
    ) -> Result<Pane<'a>> {
        let container = self.container_mut(id)?;
        Ok(Pane::new(container, frame, layout))
    }

    /// Ready dockable plugins, as input to layout restore and presets
    pub fn ready_panes(&self) -> ReadySet {
        self.states
            .iter()
            .filter(|(_, s)| s.status == PluginStatus::Ready)
            .filter_map(|(id, s)| {
                let hosted = s.hosted.as_deref()?;
                let descriptor = self.descriptors.get(id)?;
                descriptor.is_dockable.then(|| {
                    let container = hosted.container();
                    (
                        id.clone(),
                        ReadyPane {
                            area: descriptor.area,
                            title: container.title().to_string(),
                            icon: container.icon().to_string(),
                        },
                    )
                })
            })
            .collect()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Route a plugin-defined action to its owner
    ///
    /// Errors raised by the plugin are logged, not returned.
    pub fn dispatch_action(
        &mut self,
        plugin: &PluginId,
        action: &str,
        checked: bool,
        services: &mut HostServices<'_>,
    ) -> Result<()> {
        let mut hosted = self.lend(plugin)?;
        let result = {
            let mut cx = PluginContext::new(self, plugin, services);
            hosted.on_action(action, checked, &mut cx)
        };
        self.give_back(plugin, hosted);

        if let Err(e) = result {
            tracing::error!(plugin = %plugin, action, "action handler failed: {:#}", e);
        }
        Ok(())
    }

    /// Deliver a background task event to the plugin that started it
    pub fn dispatch_task_event(
        &mut self,
        plugin: &PluginId,
        task: &str,
        event: TaskEvent<TaskOutput>,
        services: &mut HostServices<'_>,
    ) -> Result<()> {
        let mut hosted = self.lend(plugin)?;
        let result = {
            let mut cx = PluginContext::new(self, plugin, services);
            hosted.on_task_event(task, event, &mut cx)
        };
        self.give_back(plugin, hosted);

        if let Err(e) = result {
            tracing::error!(plugin = %plugin, task, "task event handler failed: {:#}", e);
        }
        Ok(())
    }

    fn lend(&mut self, id: &PluginId) -> Result<Box<dyn HostedPlugin>> {
        self.states
            .get_mut(id)
            .filter(|s| s.status == PluginStatus::Ready)
            .and_then(|s| s.hosted.take())
            .ok_or_else(|| RuntimeError::NotReady(id.clone()))
    }

    fn give_back(&mut self, id: &PluginId, hosted: Box<dyn HostedPlugin>) {
        if let Some(state) = self.states.get_mut(id) {
            state.hosted = Some(hosted);
        }
    }

    pub fn focus_in(&mut self, id: &PluginId) {
        if let Ok(hosted) = self.hosted_mut(id) {
            hosted.focus_in();
        }
    }

    pub fn focus_out(&mut self, id: &PluginId) {
        if let Ok(hosted) = self.hosted_mut(id) {
            hosted.focus_out();
        }
    }

    /// Re-read every ready plugin's state into its container
    pub fn refresh_all(&mut self) {
        for state in self.states.values_mut() {
            if state.status != PluginStatus::Ready {
                continue;
            }
            if let Some(hosted) = state.hosted.as_mut() {
                hosted.refresh();
            }
        }
    }

    /// Lock or unlock the title bar of every ready pane
    pub fn lock_all(&mut self, locked: bool, layout: &mut LayoutEngine) {
        layout.set_locked(locked);
        for state in self.states.values_mut() {
            if state.status != PluginStatus::Ready {
                continue;
            }
            if let Some(hosted) = state.hosted.as_mut() {
                hosted.container_mut().set_title_bar_locked(locked);
            }
        }
    }

    /// Mirror the engine's maximized pane onto the containers
    pub fn sync_maximized(&mut self, layout: &LayoutEngine) {
        let maximized = layout.maximized();
        for (id, state) in self.states.iter_mut() {
            if let Some(hosted) = state.hosted.as_mut() {
                hosted
                    .container_mut()
                    .set_maximized_state(maximized == Some(id));
            }
        }
    }

    /// Containers currently reporting themselves maximized
    pub fn maximized_count(&self) -> usize {
        self.states
            .values()
            .filter_map(|s| s.hosted.as_deref())
            .filter(|h| h.container().get_maximized_state())
            .count()
    }
}

#[derive(Debug, Clone, Copy)]
enum Delivery {
    Available,
    Teardown,
}
