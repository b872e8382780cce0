//! Runtime state of one plugin

use std::fmt;

use super::descriptor::PluginId;
use super::hosted::HostedPlugin;

/// Lifecycle status
///
/// Startup moves `Registered → Instantiating → Ready`, shutdown moves
/// `Ready → TearingDown → Torn`. A failed construction goes straight from
/// `Instantiating` to `Torn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginStatus {
    Registered,
    Instantiating,
    Ready,
    TearingDown,
    Torn,
}

impl PluginStatus {
    /// Whether `self → next` is a legal transition
    pub fn can_advance_to(self, next: PluginStatus) -> bool {
        use PluginStatus::*;
        matches!(
            (self, next),
            (Registered, Instantiating)
                | (Registered, Torn)
                | (Instantiating, Ready)
                | (Instantiating, Torn)
                | (Ready, TearingDown)
                | (TearingDown, Torn)
        )
    }
}

impl fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PluginStatus::Registered => "registered",
            PluginStatus::Instantiating => "instantiating",
            PluginStatus::Ready => "ready",
            PluginStatus::TearingDown => "tearing down",
            PluginStatus::Torn => "torn",
        };
        f.write_str(name)
    }
}

pub(crate) struct PluginState {
    pub status: PluginStatus,
    /// Present while `Ready` or `TearingDown`, except while lent to a callback
    pub hosted: Option<Box<dyn HostedPlugin>>,
    /// Position in the order plugins became ready
    pub ready_seq: Option<u64>,
}

impl PluginState {
    pub fn new() -> Self {
        Self {
            status: PluginStatus::Registered,
            hosted: None,
            ready_seq: None,
        }
    }

    pub fn advance(&mut self, id: &PluginId, next: PluginStatus) {
        debug_assert!(
            self.status.can_advance_to(next),
            "illegal transition for {}: {} -> {}",
            id,
            self.status,
            next
        );
        tracing::debug!(plugin = %id, "{} -> {}", self.status, next);
        self.status = next;
    }
}

/// Journal entry of the plugin lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Instantiated(PluginId),
    Ready(PluginId),
    Available { observer: PluginId, target: PluginId },
    Teardown { observer: PluginId, target: PluginId },
    Torn(PluginId),
    /// Construction failed, or a required dependency never became ready
    Failed(PluginId),
}
