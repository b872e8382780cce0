//! On-disk layout file
//!
//! One JSON document holding the current snapshot, per-pane settings and
//! custom layouts. Writes go to a sibling temp file that is then renamed over
//! the target, so a crash never leaves a half-written layout behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::snapshot::{LayoutSnapshot, WINDOW_STATE_VERSION};
use crate::error::{Result, RuntimeError};
use crate::host::Rect;
use crate::plugin::PluginId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub version: u32,
    #[serde(default)]
    pub current: Option<LayoutSnapshot>,
    #[serde(default)]
    pub window_geometry: BTreeMap<PluginId, Rect>,
    #[serde(default)]
    pub undocked_before_hidden: BTreeMap<PluginId, bool>,
    #[serde(default)]
    pub custom: BTreeMap<String, LayoutSnapshot>,
    #[serde(default)]
    pub locked: bool,
}

impl Default for LayoutFile {
    fn default() -> Self {
        Self {
            version: WINDOW_STATE_VERSION,
            current: None,
            window_geometry: BTreeMap::new(),
            undocked_before_hidden: BTreeMap::new(),
            custom: BTreeMap::new(),
            locked: false,
        }
    }
}

/// Just enough of the file to check its version before parsing the rest
#[derive(Deserialize)]
struct Header {
    version: u32,
}

/// Result of reading the layout file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No file yet
    Missing,
    /// Written by another schema version; the caller falls back to a preset
    VersionMismatch { found: u32 },
    Loaded(LayoutFile),
}

#[derive(Debug, Clone)]
pub struct LayoutStore {
    path: PathBuf,
}

impl LayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, `None` without a config directory
    pub fn default_location() -> Option<Self> {
        crate::config_paths::layout_file().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<LoadOutcome> {
        if !self.path.exists() {
            tracing::debug!("Layout file not found at {}", self.path.display());
            return Ok(LoadOutcome::Missing);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let header: Header = serde_json::from_str(&content).map_err(|e| {
            RuntimeError::Persistence(format!("{}: {}", self.path.display(), e))
        })?;
        if header.version != WINDOW_STATE_VERSION {
            tracing::warn!(
                found = header.version,
                expected = WINDOW_STATE_VERSION,
                "Ignoring layout file at {}",
                self.path.display()
            );
            return Ok(LoadOutcome::VersionMismatch {
                found: header.version,
            });
        }

        let file: LayoutFile = serde_json::from_str(&content).map_err(|e| {
            RuntimeError::Persistence(format!("{}: {}", self.path.display(), e))
        })?;
        tracing::info!("Loaded layout from {}", self.path.display());
        Ok(LoadOutcome::Loaded(file))
    }

    /// Write `file` atomically
    pub fn save(&self, file: &LayoutFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(file)
            .map_err(|e| RuntimeError::Persistence(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved layout to {}", self.path.display());
        Ok(())
    }
}
