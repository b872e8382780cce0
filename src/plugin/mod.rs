//! Plugins and their lifecycle
//!
//! - `PluginDescriptor`: static metadata and the factory of one plugin
//! - `Plugin`: the trait a plugin's widget implements
//! - `Listeners` / `ObserverMixin`: availability and teardown callbacks
//! - `PluginRegistry`: activation order, startup, dispatch and teardown

mod api;
mod context;
mod descriptor;
pub(crate) mod hosted;
mod observer;
mod order;
mod registry;
mod state;

/// The one plugin allowed to listen to `ALL` without declaring it
pub const LAYOUT_PLUGIN: &str = "layout";

pub use api::{PaneSetup, Plugin};
pub use context::{HostServices, PluginContext};
pub use descriptor::{Dependency, PluginDescriptor, PluginId};
pub use observer::{Listener, ListenerFn, ListenerKind, Listeners, ObserverMixin};
pub use order::activation_order;
pub use registry::PluginRegistry;
pub use state::{LifecycleEvent, PluginStatus};
