//! Built-in plugins
//!
//! - `Editor`: open files, saving through a worker
//! - `Console`: output scrollback
//! - `Explorer`: directory listing through a worker
//! - `Placeholder`: empty panes (variable explorer, help, plots, outline, history)
//! - `LayoutPlugin`: panes menu, maximize, lock and preset actions

mod console;
mod editor;
mod explorer;
pub mod ids;
mod layout;
mod placeholder;

use std::path::PathBuf;

pub use console::{Console, CLEAR_CONSOLE};
pub use editor::{Editor, OpenFile, CLOSE_FILE, NEW_FILE, SAVE};
pub use explorer::{Explorer, REFRESH};
pub use layout::{
    preset_action_id, LayoutPlugin, DEFAULT_LAYOUT, LAYOUTS_MENU, LOCK_PANES,
    MAXIMIZE_CURRENT_PANE, PANES_MENU, SAVE_CURRENT_LAYOUT,
};
pub use placeholder::Placeholder;

use crate::host::DockArea;
use crate::plugin::PluginDescriptor;

/// What the built-in plugins start with
#[derive(Debug, Clone, Default)]
pub struct BuiltinOptions {
    /// Files the editor opens at startup
    pub files: Vec<PathBuf>,
    /// Directory shown by the explorer; the working directory if `None`
    pub explorer_root: Option<PathBuf>,
}

/// Descriptors of every built-in plugin
pub fn builtin_descriptors(options: BuiltinOptions) -> Vec<PluginDescriptor> {
    let files = options.files;
    let root = options
        .explorer_root
        .unwrap_or_else(|| PathBuf::from("."));

    vec![
        PluginDescriptor::new(ids::EDITOR, move || Ok(Editor::with_files(files.clone())))
            .title("Editor")
            .area(DockArea::Left)
            .optional([ids::CONSOLE]),
        PluginDescriptor::new(ids::CONSOLE, || Ok(Console::new()))
            .title("IPython Console")
            .area(DockArea::Right),
        PluginDescriptor::new(ids::EXPLORER, move || Ok(Explorer::new(root.clone())))
            .title("Files")
            .requires([ids::EDITOR]),
        PluginDescriptor::new(ids::VARIABLE_EXPLORER, || {
            Ok(Placeholder::new("Variable Explorer", "No variables to show"))
        })
        .optional([ids::CONSOLE]),
        PluginDescriptor::new(ids::HELP, || {
            Ok(Placeholder::new("Help", "Type an object name to get help"))
        }),
        PluginDescriptor::new(ids::PLOTS, || Ok(Placeholder::new("Plots", "No plots yet"))),
        PluginDescriptor::new(ids::OUTLINE, || {
            Ok(Placeholder::new("Outline", "Open a file to see its outline"))
        })
        .requires([ids::EDITOR]),
        PluginDescriptor::new(ids::HISTORY, || {
            Ok(Placeholder::new("History", "No commands run yet"))
        })
        .area(DockArea::Right)
        .optional([ids::CONSOLE]),
        PluginDescriptor::new(ids::LAYOUT, || Ok(LayoutPlugin::new()))
            .title("Layout")
            .requires_all()
            .dockable(false),
    ]
}
