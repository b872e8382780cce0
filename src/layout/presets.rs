//! Built-in layout presets
//!
//! A preset is a list of tab groups, each attached to a dock area. Exactly
//! one group is the default: Ready plugins the preset does not name are
//! added to it, hidden.

use std::fmt;

use crate::host::DockArea;
use crate::plugins::ids;

/// One tab group of a preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetArea {
    pub area: DockArea,
    pub plugin_ids: &'static [&'static str],
    /// Members that start hidden
    pub hidden_plugin_ids: &'static [&'static str],
    pub default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Default,
    RStudio,
    Matlab,
    HorizontalSplit,
    VerticalSplit,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Default,
        Preset::RStudio,
        Preset::Matlab,
        Preset::HorizontalSplit,
        Preset::VerticalSplit,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "Spyder default",
            Preset::RStudio => "RStudio",
            Preset::Matlab => "Matlab",
            Preset::HorizontalSplit => "Horizontal split",
            Preset::VerticalSplit => "Vertical split",
        }
    }

    /// Short identifier used in config files and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::RStudio => "rstudio",
            Preset::Matlab => "matlab",
            Preset::HorizontalSplit => "horizontal",
            Preset::VerticalSplit => "vertical",
        }
    }

    /// Look a preset up by key or display name, ignoring case
    pub fn from_name(name: &str) -> Option<Preset> {
        let name = name.trim();
        Preset::ALL.into_iter().find(|p| {
            p.key().eq_ignore_ascii_case(name) || p.name().eq_ignore_ascii_case(name)
        })
    }

    pub fn areas(&self) -> &'static [PresetArea] {
        match self {
            Preset::Default => DEFAULT_AREAS,
            Preset::RStudio => RSTUDIO_AREAS,
            Preset::Matlab => MATLAB_AREAS,
            Preset::HorizontalSplit => HORIZONTAL_AREAS,
            Preset::VerticalSplit => VERTICAL_AREAS,
        }
    }

    pub fn default_area(&self) -> &'static PresetArea {
        // Every preset table has exactly one default group (checked in tests)
        self.areas()
            .iter()
            .find(|a| a.default)
            .unwrap_or(&self.areas()[0])
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const DEFAULT_AREAS: &[PresetArea] = &[
    PresetArea {
        area: DockArea::Left,
        plugin_ids: &[ids::EDITOR],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[
            ids::HELP,
            ids::VARIABLE_EXPLORER,
            ids::PLOTS,
            ids::EXPLORER,
            ids::OUTLINE,
        ],
        hidden_plugin_ids: &[ids::OUTLINE],
        default: true,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[ids::CONSOLE, ids::HISTORY],
        hidden_plugin_ids: &[],
        default: false,
    },
];

const RSTUDIO_AREAS: &[PresetArea] = &[
    PresetArea {
        area: DockArea::Left,
        plugin_ids: &[ids::EDITOR],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Left,
        plugin_ids: &[ids::CONSOLE],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[ids::VARIABLE_EXPLORER, ids::HISTORY, ids::OUTLINE],
        hidden_plugin_ids: &[ids::OUTLINE],
        default: false,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[ids::EXPLORER, ids::PLOTS, ids::HELP],
        hidden_plugin_ids: &[],
        default: true,
    },
];

const MATLAB_AREAS: &[PresetArea] = &[
    PresetArea {
        area: DockArea::Left,
        plugin_ids: &[ids::EXPLORER],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Left,
        plugin_ids: &[ids::OUTLINE],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Top,
        plugin_ids: &[ids::EDITOR],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Bottom,
        plugin_ids: &[ids::CONSOLE],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[ids::VARIABLE_EXPLORER],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[ids::PLOTS, ids::HISTORY, ids::HELP],
        hidden_plugin_ids: &[],
        default: true,
    },
];

const HORIZONTAL_AREAS: &[PresetArea] = &[
    PresetArea {
        area: DockArea::Left,
        plugin_ids: &[ids::EDITOR],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Right,
        plugin_ids: &[
            ids::CONSOLE,
            ids::EXPLORER,
            ids::HELP,
            ids::VARIABLE_EXPLORER,
            ids::PLOTS,
            ids::HISTORY,
        ],
        hidden_plugin_ids: &[],
        default: true,
    },
];

const VERTICAL_AREAS: &[PresetArea] = &[
    PresetArea {
        area: DockArea::Top,
        plugin_ids: &[ids::EDITOR],
        hidden_plugin_ids: &[],
        default: false,
    },
    PresetArea {
        area: DockArea::Bottom,
        plugin_ids: &[
            ids::CONSOLE,
            ids::EXPLORER,
            ids::HELP,
            ids::VARIABLE_EXPLORER,
            ids::PLOTS,
            ids::HISTORY,
        ],
        hidden_plugin_ids: &[],
        default: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_default_area() {
        for preset in Preset::ALL {
            let defaults = preset.areas().iter().filter(|a| a.default).count();
            assert_eq!(defaults, 1, "{} must have one default area", preset);
        }
    }

    #[test]
    fn test_hidden_ids_are_members() {
        for preset in Preset::ALL {
            for area in preset.areas() {
                for hidden in area.hidden_plugin_ids {
                    assert!(area.plugin_ids.contains(hidden), "{}: {}", preset, hidden);
                }
            }
        }
    }

    #[test]
    fn test_no_plugin_in_two_areas() {
        for preset in Preset::ALL {
            let mut seen = std::collections::BTreeSet::new();
            for area in preset.areas() {
                for id in area.plugin_ids {
                    assert!(seen.insert(*id), "{} lists {} twice", preset, id);
                }
            }
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Preset::from_name("default"), Some(Preset::Default));
        assert_eq!(Preset::from_name("Spyder default"), Some(Preset::Default));
        assert_eq!(Preset::from_name("MATLAB"), Some(Preset::Matlab));
        assert_eq!(Preset::from_name("vertical split"), Some(Preset::VerticalSplit));
        assert_eq!(Preset::from_name("nope"), None);
    }
}
