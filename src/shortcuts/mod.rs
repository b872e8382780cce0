//! Keyboard shortcuts
//!
//! A shortcut names an action by `(plugin, context, id)`; pressing it looks
//! the action up in the `UiRegistry` and triggers it like a menu click.
//!
//! ```text
//! Keystroke → ShortcutMap::handle_keystroke() → ActionRef → resolve() → Action::trigger() → Msg
//! ```

mod binding;
mod config;
mod map;
mod types;

pub use binding::{ActionRef, Shortcut};
pub use config::{load_shortcuts_file, parse_key_sequence, parse_shortcuts_yaml, ShortcutError, UNBOUND};
pub use map::{merge_shortcuts, resolve, KeyAction, ShortcutMap};
pub use types::{KeyCode, Keystroke, Modifiers};
