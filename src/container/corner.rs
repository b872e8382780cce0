//! Corner region of a container
//!
//! Holds the options ("hamburger") button followed by any extra buttons a
//! plugin wants next to it.

use std::rc::Rc;

use crate::actions::ToolButton;
use crate::error::{Result, RuntimeError};

/// Id the options button must carry
pub const OPTIONS_BUTTON: &str = "options_button";

#[derive(Debug, Default)]
pub struct CornerWidget {
    buttons: Vec<Rc<ToolButton>>,
}

impl CornerWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `button`, at the end or right before `before`
    ///
    /// The first button must be the options button, ids are unique and
    /// `before` must already be present.
    pub fn add(&mut self, button: Rc<ToolButton>, before: Option<&str>) -> Result<()> {
        if self.buttons.is_empty() && button.id() != OPTIONS_BUTTON {
            return Err(RuntimeError::invariant(format!(
                "first corner widget must be '{}', got '{}'",
                OPTIONS_BUTTON,
                button.id()
            )));
        }
        if self.contains(button.id()) {
            return Err(RuntimeError::invariant(format!(
                "corner widget '{}' already added",
                button.id()
            )));
        }

        match before {
            Some(before) => {
                let Some(index) = self.buttons.iter().position(|b| b.id() == before) else {
                    return Err(RuntimeError::invariant(format!(
                        "cannot insert '{}' before missing corner widget '{}'",
                        button.id(),
                        before
                    )));
                };
                self.buttons.insert(index, button);
            }
            None => self.buttons.push(button),
        }
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.buttons.iter().any(|b| b.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Rc<ToolButton>> {
        self.buttons.iter().find(|b| b.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
