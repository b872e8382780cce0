//! Layout message handlers (presets, custom layouts, locking)

use crate::commands::Cmd;
use crate::host::HostWindow;
use crate::messages::LayoutMsg;

pub fn update_layout(host: &mut HostWindow, msg: LayoutMsg) -> Option<Cmd> {
    match msg {
        LayoutMsg::ApplyPreset(name) => {
            let ready = host.plugins.ready_panes();
            match host
                .layout
                .apply_preset_by_name(&name, &mut host.frame, &ready)
            {
                Ok(()) => Some(Cmd::Redraw),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            }
        }

        LayoutMsg::SaveCustom(name) => {
            host.layout.save_custom(name, &host.frame);
            Some(Cmd::PersistLayout)
        }

        LayoutMsg::LoadCustom(name) => {
            let ready = host.plugins.ready_panes();
            match host.layout.load_custom(&name, &mut host.frame, &ready) {
                Ok(()) => Some(Cmd::Redraw),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            }
        }

        LayoutMsg::LockAll(locked) => {
            host.plugins.lock_all(locked, &mut host.layout);
            Some(Cmd::Redraw)
        }

        LayoutMsg::Persist => Some(Cmd::PersistLayout),
    }
}
