//! Command-line argument parsing
//!
//! Supports:
//! - Opening files in the editor and a directory in the file explorer
//! - Ignoring the saved layout, or starting from a named preset
//! - Printing the plugin activation order

use clap::Parser;
use std::path::PathBuf;

use crate::config::RuntimeConfig;
use crate::layout::Preset;
use crate::plugins::BuiltinOptions;

/// A dockable plugin runtime
#[derive(Parser, Debug)]
#[command(name = "dockyard", version, about = "A dockable plugin runtime")]
pub struct CliArgs {
    /// Files to open in the editor; a directory becomes the explorer root
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Ignore the saved layout and apply the configured preset
    #[arg(long)]
    pub reset_layout: bool,

    /// Start from a layout preset (default, rstudio, matlab, horizontal, vertical)
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,

    /// Print the plugin activation order and exit
    #[arg(long)]
    pub list_plugins: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Files the editor opens
    pub files: Vec<PathBuf>,
    /// Directory shown by the explorer
    pub explorer_root: Option<PathBuf>,
    /// Preset overriding the configured default
    pub layout: Option<Preset>,
    /// Skip the saved layout
    pub reset_layout: bool,
    pub list_plugins: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let layout = match &self.layout {
            Some(name) => Some(
                Preset::from_name(name).ok_or_else(|| format!("Unknown layout preset '{}'", name))?,
            ),
            None => None,
        };

        let (dirs, files): (Vec<_>, Vec<_>) = self.paths.into_iter().partition(|p| p.is_dir());
        if dirs.len() > 1 {
            return Err("Cannot open multiple directories".to_string());
        }

        Ok(StartupConfig {
            files,
            explorer_root: dirs.into_iter().next(),
            layout,
            reset_layout: self.reset_layout,
            list_plugins: self.list_plugins,
        })
    }
}

impl StartupConfig {
    /// Fold the layout overrides into the loaded runtime configuration
    pub fn apply_to(&self, config: &mut RuntimeConfig) {
        if let Some(preset) = self.layout {
            config.default_layout = preset.key().to_string();
            config.restore_layout = false;
        }
        if self.reset_layout {
            config.restore_layout = false;
        }
    }

    /// What the built-in plugins start with
    pub fn builtin_options(&self) -> BuiltinOptions {
        BuiltinOptions {
            files: self.files.clone(),
            explorer_root: self.explorer_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(paths: Vec<PathBuf>) -> CliArgs {
        CliArgs {
            paths,
            reset_layout: false,
            layout: None,
            list_plugins: false,
        }
    }

    #[test]
    fn test_files_go_to_editor() {
        let config = args(vec![PathBuf::from("a.py"), PathBuf::from("b.py")])
            .into_config()
            .unwrap();
        assert_eq!(config.files.len(), 2);
        assert!(config.explorer_root.is_none());
    }

    #[test]
    fn test_directory_becomes_explorer_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = args(vec![dir.path().to_path_buf(), PathBuf::from("a.py")])
            .into_config()
            .unwrap();
        assert_eq!(config.explorer_root.as_deref(), Some(dir.path()));
        assert_eq!(config.files, vec![PathBuf::from("a.py")]);
    }

    #[test]
    fn test_multiple_directories_rejected() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let result = args(vec![a.path().to_path_buf(), b.path().to_path_buf()]).into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_layout_override() {
        let mut cli = args(vec![]);
        cli.layout = Some("RStudio".to_string());
        let startup = cli.into_config().unwrap();
        assert_eq!(startup.layout, Some(Preset::RStudio));

        let mut config = RuntimeConfig::default();
        startup.apply_to(&mut config);
        assert_eq!(config.default_layout, "rstudio");
        assert!(!config.restore_layout);
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let mut cli = args(vec![]);
        cli.layout = Some("tiled".to_string());
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_reset_layout_keeps_default_preset() {
        let mut cli = args(vec![]);
        cli.reset_layout = true;
        let startup = cli.into_config().unwrap();

        let mut config = RuntimeConfig::default();
        startup.apply_to(&mut config);
        assert_eq!(config.default_layout, "default");
        assert!(!config.restore_layout);
    }

    #[test]
    fn test_parse_flags() {
        let cli = CliArgs::parse_from(["dockyard", "--list-plugins", "--layout", "matlab", "x.py"]);
        assert!(cli.list_plugins);
        assert_eq!(cli.layout.as_deref(), Some("matlab"));
        assert_eq!(cli.paths, vec![PathBuf::from("x.py")]);
    }
}
