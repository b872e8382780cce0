//! Availability and teardown listeners
//!
//! A plugin declares "call this method when plugin X becomes available" and
//! "call this method when plugin X is torn down" in a `Listeners` table. The
//! same table drives runtime dispatch and the registration-time check that
//! every observed plugin is a declared dependency.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::context::PluginContext;
use super::descriptor::{Dependency, PluginDescriptor, PluginId};
use super::LAYOUT_PLUGIN;
use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    Available,
    Teardown,
}

pub type ListenerFn<P> = fn(&mut P, &PluginId, &mut PluginContext<'_>) -> anyhow::Result<()>;

/// One declared callback
pub struct Listener<P> {
    pub name: &'static str,
    pub callback: ListenerFn<P>,
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            callback: self.callback,
        }
    }
}

/// Declared listener table of a plugin type
pub struct Listeners<P> {
    entries: Vec<(Dependency, ListenerKind, Listener<P>)>,
}

impl<P> Default for Listeners<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Listeners<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Call `callback` once `target` is available
    pub fn on_available(
        mut self,
        target: impl Into<Dependency>,
        name: &'static str,
        callback: ListenerFn<P>,
    ) -> Self {
        self.entries.push((
            target.into(),
            ListenerKind::Available,
            Listener { name, callback },
        ));
        self
    }

    /// Call `callback` when `target` is about to be torn down
    pub fn on_teardown(
        mut self,
        target: impl Into<Dependency>,
        name: &'static str,
        callback: ListenerFn<P>,
    ) -> Self {
        self.entries.push((
            target.into(),
            ListenerKind::Teardown,
            Listener { name, callback },
        ));
        self
    }

    pub(crate) fn targets(&self) -> Vec<(Dependency, ListenerKind)> {
        self.entries
            .iter()
            .map(|(dep, kind, _)| (dep.clone(), *kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check declared listener targets against `requires ∪ optional`
///
/// Only the layout plugin may listen to `ALL` without declaring it.
pub(crate) fn validate_targets(
    descriptor: &PluginDescriptor,
    targets: &[(Dependency, ListenerKind)],
) -> Result<()> {
    let mut seen = BTreeSet::new();

    for (target, kind) in targets {
        if !seen.insert((target.clone(), *kind)) {
            return Err(RuntimeError::invariant(format!(
                "plugin {} declares two {:?} listeners for {}",
                descriptor.id, kind, target
            )));
        }

        let allowed = match target {
            Dependency::All => {
                descriptor.depends_on(target) || descriptor.id.as_str() == LAYOUT_PLUGIN
            }
            Dependency::Plugin(_) => descriptor.depends_on(target),
        };

        if !allowed {
            return Err(RuntimeError::invariant(format!(
                "plugin {} listens to {} without declaring it in requires or optional",
                descriptor.id, target
            )));
        }
    }

    Ok(())
}

/// Per-plugin dispatcher built from a validated `Listeners` table
pub struct ObserverMixin<P> {
    plugin: PluginId,
    available: BTreeMap<Dependency, Listener<P>>,
    teardown: BTreeMap<Dependency, Listener<P>>,
}

impl<P> ObserverMixin<P> {
    pub fn new(descriptor: &PluginDescriptor, listeners: Listeners<P>) -> Result<Self> {
        validate_targets(descriptor, &listeners.targets())?;

        let mut available = BTreeMap::new();
        let mut teardown = BTreeMap::new();
        for (target, kind, listener) in listeners.entries {
            match kind {
                ListenerKind::Available => available.insert(target, listener),
                ListenerKind::Teardown => teardown.insert(target, listener),
            };
        }

        Ok(Self {
            plugin: descriptor.id.clone(),
            available,
            teardown,
        })
    }

    pub fn listens_to(&self, target: &PluginId) -> bool {
        Self::matches(&self.available, target)
    }

    pub fn listens_to_teardown(&self, target: &PluginId) -> bool {
        Self::matches(&self.teardown, target)
    }

    fn matches(table: &BTreeMap<Dependency, Listener<P>>, target: &PluginId) -> bool {
        table.contains_key(&Dependency::Plugin(target.clone()))
            || table.contains_key(&Dependency::All)
    }

    /// Dispatch to the specific listener, then to the `ALL` listener
    ///
    /// Returns the number of callbacks that failed. Failures are logged and
    /// never stop the remaining callbacks.
    pub fn on_plugin_available(
        &self,
        widget: &mut P,
        target: &PluginId,
        cx: &mut PluginContext<'_>,
    ) -> usize {
        self.dispatch(&self.available, "available", widget, target, cx)
    }

    pub fn on_plugin_teardown(
        &self,
        widget: &mut P,
        target: &PluginId,
        cx: &mut PluginContext<'_>,
    ) -> usize {
        self.dispatch(&self.teardown, "teardown", widget, target, cx)
    }

    fn dispatch(
        &self,
        table: &BTreeMap<Dependency, Listener<P>>,
        event: &str,
        widget: &mut P,
        target: &PluginId,
        cx: &mut PluginContext<'_>,
    ) -> usize {
        let specific = table.get(&Dependency::Plugin(target.clone()));
        let all = table.get(&Dependency::All);

        let mut failures = 0;
        for listener in specific.into_iter().chain(all) {
            tracing::debug!(
                plugin = %self.plugin,
                target = %target,
                callback = listener.name,
                "dispatching {} event",
                event
            );
            if let Err(e) = (listener.callback)(widget, target, cx) {
                failures += 1;
                tracing::error!(
                    plugin = %self.plugin,
                    target = %target,
                    callback = listener.name,
                    "{} callback failed: {:#}",
                    event,
                    e
                );
            }
        }
        failures
    }
}
