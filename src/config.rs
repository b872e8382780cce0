//! Runtime configuration persistence
//!
//! Stores user preferences in `~/.config/dockyard/config.yaml`

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::plugin::PluginId;

/// Preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Overlay a message on panes with nothing to display
    pub show_empty_state: bool,
    /// Start with pane title bars locked
    pub lock_panes: bool,
    /// Plugins that are never started
    pub disabled_plugins: BTreeSet<PluginId>,
    /// Preset applied when there is no usable saved layout
    pub default_layout: String,
    /// Restore the last session's layout at startup
    pub restore_layout: bool,
    /// How long transient status-bar messages stay up
    pub status_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_empty_state: true,
            lock_panes: true,
            disabled_plugins: BTreeSet::new(),
            default_layout: "default".to_string(),
            restore_layout: true,
            status_timeout_ms: 5000,
        }
    }
}

impl RuntimeConfig {
    /// Load config from the default location, or defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; missing or malformed files give defaults
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config, using defaults: {}", e);
                return Self::default();
            }
        };

        serde_yaml::from_str::<RuntimeConfig>(&content)
            .map(|config| {
                tracing::info!(path = %path.display(), "loaded config");
                config
            })
            .unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "malformed config, using defaults: {}", e);
                Self::default()
            })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| anyhow::anyhow!("No config directory available"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context as _;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "lock_panes: false\ndisabled_plugins: [plots]\n").unwrap();

        let config = RuntimeConfig::load_from(&path);
        assert!(!config.lock_panes);
        assert!(config.show_empty_state);
        assert!(config.disabled_plugins.contains(&PluginId::from("plots")));
        assert_eq!(config.default_layout, "default");
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "lock_panes: [not, a, bool").unwrap();
        assert_eq!(RuntimeConfig::load_from(&path), RuntimeConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.yaml");
        let mut config = RuntimeConfig::default();
        config.default_layout = "matlab".to_string();
        config.save_to(&path).unwrap();
        assert_eq!(RuntimeConfig::load_from(&path), config);
    }
}
