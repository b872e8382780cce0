//! Pane message handlers (dock, float, hide, raise, maximize)

use crate::commands::Cmd;
use crate::container::Pane;
use crate::host::HostWindow;
use crate::messages::PaneMsg;
use crate::plugin::PluginId;

pub fn update_pane(host: &mut HostWindow, msg: PaneMsg) -> Option<Cmd> {
    match msg {
        PaneMsg::Undock(id) => with_pane(host, &id, |pane| pane.create_window()),
        PaneMsg::Dock(id) => with_pane(host, &id, |pane| pane.dock_window()),
        PaneMsg::Close(id) => with_pane(host, &id, |pane| pane.toggle_view(false)),
        PaneMsg::ToggleView { plugin, visible } => {
            with_pane(host, &plugin, |pane| pane.toggle_view(visible))
        }
        PaneMsg::LockUnlock(id) => with_pane(host, &id, |pane| pane.lock_unlock_position()),
        PaneMsg::Raise {
            plugin,
            force_focus,
        } => with_pane(host, &plugin, |pane| {
            pane.switch_to(force_focus);
        }),
        PaneMsg::FocusIn(id) => {
            if host.plugins.is_available(&id) {
                host.plugins.focus_in(&id);
                host.frame.set_focus(Some(id));
            }
            None
        }
        PaneMsg::FocusOut(id) => {
            host.plugins.focus_out(&id);
            if host.frame.focus() == Some(&id) {
                host.frame.set_focus(None);
            }
            None
        }
        PaneMsg::ToggleMaximize(id) => {
            if !host.plugins.is_available(&id) {
                tracing::warn!(plugin = %id, "cannot maximize a pane that is not ready");
                return None;
            }
            let maximized = host.layout.toggle_maximize(&id, &mut host.frame);
            host.plugins.sync_maximized(&host.layout);
            tracing::debug!(plugin = %id, maximized, "toggled maximize");
            Some(Cmd::Redraw)
        }
    }
}

/// Run `f` against a ready plugin's pane
fn with_pane(host: &mut HostWindow, id: &PluginId, f: impl FnOnce(&mut Pane<'_>)) -> Option<Cmd> {
    match host.plugins.pane(id, &mut host.frame, &mut host.layout) {
        Ok(mut pane) => {
            f(&mut pane);
            Some(Cmd::Redraw)
        }
        Err(e) => {
            tracing::warn!(plugin = %id, "ignoring pane message: {}", e);
            None
        }
    }
}
