//! A key sequence bound to an action reference

use std::fmt;

use super::types::Keystroke;
use crate::actions::{Context, Owner};

/// Address of an action in the registry: `(plugin, context, id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionRef {
    pub plugin: Owner,
    pub context: Context,
    pub action: String,
}

impl ActionRef {
    pub fn new(
        plugin: impl Into<Owner>,
        context: impl Into<Context>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            context: context.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.plugin, self.context, self.action)
    }
}

/// One or more keystrokes (a chord) triggering an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub keystrokes: Vec<Keystroke>,
    /// `None` removes inherited bindings for the same keys
    pub target: Option<ActionRef>,
}

impl Shortcut {
    pub fn new(keystroke: Keystroke, target: ActionRef) -> Self {
        Self {
            keystrokes: vec![keystroke],
            target: Some(target),
        }
    }

    pub fn chord(keystrokes: Vec<Keystroke>, target: ActionRef) -> Self {
        Self {
            keystrokes,
            target: Some(target),
        }
    }

    pub fn unbound(keystrokes: Vec<Keystroke>) -> Self {
        Self {
            keystrokes,
            target: None,
        }
    }

    pub fn is_chord(&self) -> bool {
        self.keystrokes.len() > 1
    }

    pub fn starts_with(&self, keystroke: &Keystroke) -> bool {
        self.keystrokes.first() == Some(keystroke)
    }

    pub fn display_string(&self) -> String {
        self.keystrokes
            .iter()
            .map(Keystroke::display_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
