//! Runtime error taxonomy
//!
//! One variant per failure kind the runtime distinguishes. Whether a kind is
//! fatal depends on where it surfaces: `CyclicDependency` and
//! `MissingDependency` abort startup, everything else is logged and the
//! application keeps running.

use thiserror::Error;

use crate::plugin::PluginId;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Cyclic plugin dependency: {}", cycle.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(" -> "))]
    CyclicDependency { cycle: Vec<PluginId> },

    #[error("Plugin {plugin} requires {dependency}, which is not registered")]
    MissingDependency {
        plugin: PluginId,
        dependency: PluginId,
    },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Plugin {0} is not ready")]
    NotReady(PluginId),

    #[error("No {kind} '{id}' registered for plugin '{plugin}' in context '{context}'")]
    NotFound {
        kind: &'static str,
        id: String,
        plugin: String,
        context: String,
    },

    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(PluginId),

    #[error("Cancelled by user")]
    UserCancelled,

    #[error("Network or IO error: {0}")]
    NetworkOrIo(String),

    #[error("Layout persistence error: {0}")]
    Persistence(String),
}

impl RuntimeError {
    pub fn invariant(message: impl Into<String>) -> Self {
        RuntimeError::InvariantViolation(message.into())
    }

    /// Fatal kinds abort startup; the rest are logged and recovered from
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RuntimeError::CyclicDependency { .. }
                | RuntimeError::MissingDependency { .. }
                | RuntimeError::DuplicatePlugin(_)
        )
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::NetworkOrIo(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
