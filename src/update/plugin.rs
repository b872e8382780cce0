//! Plugin-defined actions

use crate::commands::Cmd;
use crate::host::HostWindow;
use crate::plugin::PluginId;

pub fn update_plugin(host: &mut HostWindow, plugin: &PluginId, action: &str, checked: bool) -> Option<Cmd> {
    let (plugins, mut services) = host.services();
    match plugins.dispatch_action(plugin, action, checked, &mut services) {
        Ok(()) => Some(Cmd::Redraw),
        Err(e) => {
            tracing::warn!(plugin = %plugin, action, "cannot deliver action: {}", e);
            None
        }
    }
}
