//! Identifiers of the built-in plugins

pub const EDITOR: &str = "editor";
pub const CONSOLE: &str = "ipython_console";
pub const VARIABLE_EXPLORER: &str = "variable_explorer";
pub const HELP: &str = "help";
pub const EXPLORER: &str = "explorer";
pub const PLOTS: &str = "plots";
pub const OUTLINE: &str = "outline_explorer";
pub const HISTORY: &str = "history";
pub const LAYOUT: &str = crate::plugin::LAYOUT_PLUGIN;
