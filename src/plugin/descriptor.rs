//! Static plugin metadata
//!
//! A `PluginDescriptor` is everything the registry needs to know about a
//! plugin before constructing it: identity, dependencies, presentation and
//! a factory for its container.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::api::Plugin;
use super::hosted::{Hosted, HostedPlugin};
use super::observer::{validate_targets, ListenerKind, ObserverMixin};
use crate::container::DockableContainer;
use crate::error::Result;
use crate::host::DockArea;

/// Unique, stable identifier of a plugin
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PluginId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&PluginId> for PluginId {
    fn from(id: &PluginId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for PluginId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PluginId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Target of a dependency declaration
///
/// `All` means "every other registered plugin". It is resolved by the
/// activation order, never by rewriting the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dependency {
    Plugin(PluginId),
    All,
}

impl Dependency {
    pub fn plugin(&self) -> Option<&PluginId> {
        match self {
            Dependency::Plugin(id) => Some(id),
            Dependency::All => None,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Dependency::All)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Plugin(id) => write!(f, "{}", id),
            Dependency::All => f.write_str("ALL"),
        }
    }
}

impl From<&str> for Dependency {
    fn from(id: &str) -> Self {
        Dependency::Plugin(PluginId::from(id))
    }
}

impl From<PluginId> for Dependency {
    fn from(id: PluginId) -> Self {
        Dependency::Plugin(id)
    }
}

impl From<&PluginId> for Dependency {
    fn from(id: &PluginId) -> Self {
        Dependency::Plugin(id.clone())
    }
}

pub(crate) type PluginFactory = Rc<dyn Fn(&PluginDescriptor) -> anyhow::Result<Box<dyn HostedPlugin>>>;

/// Static metadata for one plugin
pub struct PluginDescriptor {
    pub id: PluginId,
    pub requires: BTreeSet<Dependency>,
    pub optional: BTreeSet<Dependency>,
    pub is_dockable: bool,
    /// Namespace of the plugin's persisted settings
    pub conf_section: String,
    pub title: String,
    pub icon: String,
    pub area: DockArea,
    pub(crate) listener_targets: Vec<(Dependency, ListenerKind)>,
    pub(crate) factory: PluginFactory,
}

impl PluginDescriptor {
    /// Describe a plugin whose container is built by `constructor`
    ///
    /// The plugin's listener table is read here, so the set of observed
    /// plugins is known before anything is constructed.
    pub fn new<P, F>(id: impl Into<PluginId>, constructor: F) -> Self
    where
        P: Plugin,
        F: Fn() -> anyhow::Result<P> + 'static,
    {
        let id = id.into();
        let listener_targets = P::listeners().targets();

        let factory: PluginFactory = Rc::new(move |desc: &PluginDescriptor| {
            let widget = constructor()?;
            let observer = ObserverMixin::new(desc, P::listeners())?;
            let container = DockableContainer::new(desc, widget.title(), widget.icon());
            Ok(Box::new(Hosted::new(container, widget, observer)) as Box<dyn HostedPlugin>)
        });

        Self {
            conf_section: id.as_str().to_string(),
            title: id.as_str().to_string(),
            icon: String::new(),
            area: DockArea::Right,
            is_dockable: true,
            requires: BTreeSet::new(),
            optional: BTreeSet::new(),
            listener_targets,
            factory,
            id,
        }
    }

    pub fn requires<I, D>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Dependency>,
    {
        self.requires.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn optional<I, D>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Dependency>,
    {
        self.optional.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Shorthand for `requires([Dependency::All])`
    pub fn requires_all(mut self) -> Self {
        self.requires.insert(Dependency::All);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn area(mut self, area: DockArea) -> Self {
        self.area = area;
        self
    }

    pub fn conf_section(mut self, section: impl Into<String>) -> Self {
        self.conf_section = section.into();
        self
    }

    pub fn dockable(mut self, is_dockable: bool) -> Self {
        self.is_dockable = is_dockable;
        self
    }

    /// Whether this plugin waits for every other plugin
    pub fn waits_for_all(&self) -> bool {
        self.requires.contains(&Dependency::All)
    }

    /// Required plugin ids, excluding the `All` sentinel
    pub fn required_plugins(&self) -> impl Iterator<Item = &PluginId> {
        self.requires.iter().filter_map(Dependency::plugin)
    }

    pub fn optional_plugins(&self) -> impl Iterator<Item = &PluginId> {
        self.optional.iter().filter_map(Dependency::plugin)
    }

    /// Whether `target` appears in `requires ∪ optional`
    pub fn depends_on(&self, target: &Dependency) -> bool {
        self.requires.contains(target) || self.optional.contains(target)
    }

    /// Check the descriptor on its own: disjoint dependency sets, no
    /// self-loop, listeners only on declared dependencies
    pub fn validate(&self) -> Result<()> {
        use crate::error::RuntimeError;

        if let Some(dup) = self.requires.intersection(&self.optional).next() {
            return Err(RuntimeError::invariant(format!(
                "plugin {} lists {} as both required and optional",
                self.id, dup
            )));
        }

        let own = Dependency::Plugin(self.id.clone());
        if self.requires.contains(&own) || self.optional.contains(&own) {
            return Err(RuntimeError::invariant(format!(
                "plugin {} depends on itself",
                self.id
            )));
        }

        validate_targets(self, &self.listener_targets)
    }

    pub(crate) fn instantiate(&self) -> anyhow::Result<Box<dyn HostedPlugin>> {
        (self.factory)(self)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("requires", &self.requires)
            .field("optional", &self.optional)
            .field("is_dockable", &self.is_dockable)
            .field("area", &self.area)
            .finish_non_exhaustive()
    }
}
