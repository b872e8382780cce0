//! Keystrokes resolved through the shortcut map and the action registry

use crate::commands::Cmd;
use crate::host::HostWindow;
use crate::shortcuts::{resolve, KeyAction, Keystroke};

pub fn update_key(host: &mut HostWindow, keystroke: Keystroke) -> Option<Cmd> {
    let focus = host.frame.focus().cloned();
    let target = match host.shortcuts.handle_keystroke(keystroke, focus.as_ref()) {
        KeyAction::Trigger(target) => target,
        KeyAction::AwaitMore => {
            tracing::trace!(%keystroke, "waiting for the rest of a chord");
            return None;
        }
        KeyAction::NoMatch => return None,
    };

    let action = match resolve(&host.ui, &target) {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!(%keystroke, "shortcut points nowhere: {}", e);
            return None;
        }
    };

    let Some(msg) = action.trigger() else {
        tracing::debug!(%keystroke, action = %target, "shortcut action is disabled");
        return None;
    };
    tracing::debug!(%keystroke, action = %target, "shortcut triggered");
    super::update(host, msg)
}
