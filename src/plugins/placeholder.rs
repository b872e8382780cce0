//! Placeholder panes
//!
//! A pane with a title and nothing inside. Stands in for plugins whose
//! content lives outside the runtime (variable explorer, help, plots).

use crate::plugin::Plugin;

#[derive(Debug, Clone)]
pub struct Placeholder {
    title: &'static str,
    message: &'static str,
}

impl Placeholder {
    pub fn new(title: &'static str, message: &'static str) -> Self {
        Self { title, message }
    }
}

impl Plugin for Placeholder {
    fn title(&self) -> String {
        self.title.to_string()
    }

    fn empty_message(&self) -> Option<String> {
        Some(self.message.to_string())
    }

    fn has_content(&self) -> bool {
        false
    }
}
