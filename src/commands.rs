//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// The visible arrangement changed
    Redraw,
    /// Write the layout file
    PersistLayout,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw => true,
            Cmd::PersistLayout => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Check if this command asks for the layout to be written
    pub fn needs_persist(&self) -> bool {
        match self {
            Cmd::PersistLayout => true,
            Cmd::Redraw => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_persist()),
        }
    }

    /// Combine two optional commands into one
    pub fn merge(a: Option<Cmd>, b: Option<Cmd>) -> Option<Cmd> {
        match (a, b) {
            (None, None) => None,
            (Some(c), None) | (None, Some(c)) => Some(c),
            (Some(Cmd::Batch(mut cmds)), Some(c)) => {
                cmds.push(c);
                Some(Cmd::Batch(cmds))
            }
            (Some(a), Some(b)) => Some(Cmd::Batch(vec![a, b])),
        }
    }
}
