//! Dockyard - dockable plugin runtime
//!
//! This crate provides the plugin lifecycle, dockable containers, UI
//! reference registries and layout persistence of a multi-pane IDE, driven
//! through an Elm-style message loop.

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod container;
pub mod error;
pub mod host;
pub mod layout;
pub mod messages;
pub mod plugin;
pub mod plugins;
pub mod shortcuts;
pub mod tracing;
pub mod update;
pub mod worker;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use host::HostWindow;
pub use messages::Msg;
