//! Update functions for the Elm-style architecture
//!
//! Every UI command reaches the runtime as a `Msg` and is applied here.

mod keys;
mod layout;
mod pane;
mod plugin;

use crate::commands::Cmd;
use crate::host::HostWindow;
use crate::messages::Msg;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use keys::update_key;
pub use layout::update_layout;
pub use pane::update_pane;
pub use plugin::update_plugin;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(host: &mut HostWindow, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(host, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(host, msg)
    }
}

fn update_inner(host: &mut HostWindow, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Pane(m) => pane::update_pane(host, m),
        Msg::Layout(m) => layout::update_layout(host, m),
        Msg::Plugin {
            plugin,
            action,
            checked,
        } => plugin::update_plugin(host, &plugin, &action, checked),
        Msg::Key(keystroke) => keys::update_key(host, keystroke),
    }
}

#[cfg(debug_assertions)]
fn update_traced(host: &mut HostWindow, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(host, msg);

    if let Some(cmd) = &result {
        debug!(target: "message", msg = %msg_name, ?cmd, "done");
    }
    result
}

/// Display name for a message, e.g. `Pane::Undock(help)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Pane(m) => format!("Pane::{:?}", m),
        Msg::Layout(m) => format!("Layout::{:?}", m),
        Msg::Plugin {
            plugin,
            action,
            checked,
        } => format!("Plugin::{}::{}({})", plugin, action, checked),
        Msg::Key(keystroke) => format!("Key::{}", keystroke),
    }
}
