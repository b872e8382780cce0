//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use dockyard::config::RuntimeConfig;
use dockyard::plugin::{LifecycleEvent, Listeners, Plugin, PluginContext, PluginDescriptor, PluginId};
use dockyard::HostWindow;

/// Callback journal shared between a test and its plugins
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Journal::default()
}

pub fn id(s: &str) -> PluginId {
    PluginId::from(s)
}

/// Host with default configuration and no layout file
pub fn test_host() -> HostWindow {
    HostWindow::new(RuntimeConfig::default())
}

/// Register every descriptor, panicking on failure
pub fn register_all(host: &mut HostWindow, descriptors: Vec<PluginDescriptor>) {
    for descriptor in descriptors {
        host.register(descriptor).unwrap();
    }
}

/// Lifecycle journal rendered as short strings, e.g. `"b.ready"` or
/// `"a -> b"` for an availability delivery to `b`
pub fn lifecycle(host: &HostWindow) -> Vec<String> {
    host.plugins
        .events()
        .iter()
        .map(|event| match event {
            LifecycleEvent::Instantiated(id) => format!("{}.instantiated", id),
            LifecycleEvent::Ready(id) => format!("{}.ready", id),
            LifecycleEvent::Available { observer, target } => format!("{} -> {}", target, observer),
            LifecycleEvent::Teardown { observer, target } => format!("{} x> {}", target, observer),
            LifecycleEvent::Torn(id) => format!("{}.torn", id),
            LifecycleEvent::Failed(id) => format!("{}.failed", id),
        })
        .collect()
}

/// Index of the first event equal to `needle`
pub fn position(events: &[String], needle: &str) -> usize {
    events
        .iter()
        .position(|e| e == needle)
        .unwrap_or_else(|| panic!("no '{}' in {:?}", needle, events))
}

// ============================================================================
// Probe plugins
// ============================================================================

/// A plugin without listeners
pub struct Quiet {
    pub title: String,
    pub can_close: bool,
    pub journal: Journal,
}

impl Quiet {
    pub fn descriptor(plugin: &str, journal: &Journal) -> PluginDescriptor {
        let journal = journal.clone();
        let title = plugin.to_string();
        PluginDescriptor::new(plugin, move || {
            Ok(Quiet {
                title: title.clone(),
                can_close: true,
                journal: journal.clone(),
            })
        })
    }
}

impl Plugin for Quiet {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn can_close(&self) -> bool {
        self.can_close
    }

    fn on_close(&mut self, _cancelable: bool) {
        self.journal.borrow_mut().push(format!("{} closed", self.title));
    }

    fn on_action(&mut self, action: &str, checked: bool, _cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.journal
            .borrow_mut()
            .push(format!("{} action {} {}", self.title, action, checked));
        Ok(())
    }
}

/// A plugin that refuses to close
pub fn refusing(plugin: &str, journal: &Journal) -> PluginDescriptor {
    let journal = journal.clone();
    let title = plugin.to_string();
    PluginDescriptor::new(plugin, move || {
        Ok(Quiet {
            title: title.clone(),
            can_close: false,
            journal: journal.clone(),
        })
    })
}

/// A plugin whose constructor fails
pub fn broken(plugin: &str) -> PluginDescriptor {
    PluginDescriptor::new(plugin, || -> anyhow::Result<Quiet> {
        anyhow::bail!("constructor failed")
    })
}

/// Journal line of an observer callback
fn record(journal: &Journal, cx: &PluginContext<'_>, what: &str, target: &PluginId) {
    journal
        .borrow_mut()
        .push(format!("{} {} {}", cx.plugin_id(), what, target));
}

/// Define a probe plugin observing one target
///
/// The probe journals `"<self> sees <target>"` and `"<self> loses <target>"`.
macro_rules! watcher {
    ($name:ident, $target:expr) => {
        pub struct $name {
            pub journal: Journal,
        }

        impl $name {
            pub fn descriptor(plugin: &str, journal: &Journal) -> PluginDescriptor {
                let journal = journal.clone();
                PluginDescriptor::new(plugin, move || {
                    Ok($name {
                        journal: journal.clone(),
                    })
                })
            }
        }

        impl Plugin for $name {
            fn title(&self) -> String {
                stringify!($name).to_string()
            }

            fn listeners() -> Listeners<Self> {
                Listeners::new()
                    .on_available($target, "on_available", |p: &mut $name, target, cx| {
                        record(&p.journal, cx, "sees", target);
                        Ok(())
                    })
                    .on_teardown($target, "on_teardown", |p: &mut $name, target, cx| {
                        record(&p.journal, cx, "loses", target);
                        Ok(())
                    })
            }
        }
    };
}

watcher!(WatchA, "a");
watcher!(WatchB, "b");
watcher!(WatchQ, "q");
watcher!(WatchAll, dockyard::plugin::Dependency::All);

/// Observes `a` with a callback that always fails
pub struct FailingWatcher {
    pub journal: Journal,
}

impl FailingWatcher {
    pub fn descriptor(plugin: &str, journal: &Journal) -> PluginDescriptor {
        let journal = journal.clone();
        PluginDescriptor::new(plugin, move || {
            Ok(FailingWatcher {
                journal: journal.clone(),
            })
        })
    }
}

impl Plugin for FailingWatcher {
    fn title(&self) -> String {
        "FailingWatcher".to_string()
    }

    fn listeners() -> Listeners<Self> {
        Listeners::new().on_available("a", "on_a_available", |p: &mut FailingWatcher, target, cx| {
            record(&p.journal, cx, "fails on", target);
            anyhow::bail!("listener failed")
        })
    }
}
