//! Console plugin: a scrollback of output lines

use crate::container::{DockableContainer, ToolbarItem, MAIN_TOOLBAR};
use crate::plugin::{PaneSetup, Plugin, PluginContext};

pub const CLEAR_CONSOLE: &str = "clear_console";

/// Lines kept before the oldest are dropped
const SCROLLBACK: usize = 10_000;

#[derive(Debug, Default)]
pub struct Console {
    lines: Vec<String>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.lines.len() > SCROLLBACK {
            let excess = self.lines.len() - SCROLLBACK;
            self.lines.drain(..excess);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Plugin for Console {
    fn title(&self) -> String {
        "IPython Console".to_string()
    }

    fn icon(&self) -> String {
        "console".to_string()
    }

    fn setup(&mut self, pane: &mut PaneSetup<'_>) -> anyhow::Result<()> {
        let clear = pane.create_action(CLEAR_CONSOLE, "Clear console", "_");
        pane.add_item_to_toolbar(ToolbarItem::stretcher("console_stretcher"), MAIN_TOOLBAR, None, None)?;
        pane.add_item_to_toolbar(ToolbarItem::from(&clear), MAIN_TOOLBAR, None, None)?;
        pane.add_to_options_menu(&clear, "console");
        Ok(())
    }

    fn update_actions(&mut self, container: &DockableContainer) {
        if let Some(clear) = container.action(CLEAR_CONSOLE) {
            clear.set_enabled(!self.lines.is_empty());
        }
    }

    fn raise_and_focus(&self) -> bool {
        true
    }

    fn focus_widget(&self) -> Option<String> {
        Some("shell".to_string())
    }

    fn on_action(&mut self, action: &str, _checked: bool, _cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        match action {
            CLEAR_CONSOLE => self.clear(),
            other => anyhow::bail!("unknown console action '{}'", other),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrollback_is_bounded() {
        let mut console = Console::new();
        for i in 0..SCROLLBACK + 5 {
            console.write_line(i.to_string());
        }
        assert_eq!(console.lines().len(), SCROLLBACK);
        assert_eq!(console.lines()[0], "5");
    }
}
