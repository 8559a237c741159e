//! Configuration types.
//!
//! Settings live in `<config_dir>/quickpanel/settings.toml`. Every field is
//! optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PAGE_SIZE: usize = 7;
pub const DEFAULT_CLEAR_DELAY_MS: u64 = 200;
pub const DEFAULT_ROW_HEIGHT: f32 = 31.0;

/// Runtime settings for the quick panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PanelSettings {
    /// Grace window between `close` and clearing the configuration,
    /// long enough for an exit animation.
    pub clear_delay_ms: u64,

    /// Fixed row height in pixels.
    pub row_height: f32,

    /// Rows laid out beyond each edge of the visible window.
    pub overscan: usize,

    /// Characters that start a search in the host text.
    pub trigger_chars: Vec<char>,

    /// Footer width at which the secondary key hints appear.
    pub wide_footer_min_width: f32,

    pub primary_modifier: PrimaryModifier,

    pub trigger_removal: TriggerRemoval,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            clear_delay_ms: DEFAULT_CLEAR_DELAY_MS,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: 4,
            trigger_chars: vec!['/', '@'],
            wide_footer_min_width: 500.0,
            primary_modifier: PrimaryModifier::Auto,
            trigger_removal: TriggerRemoval::SuffixAnchored,
        }
    }
}

/// Which key acts as the primary modifier for paging and multi-select.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryModifier {
    /// Command on macOS, Control elsewhere.
    #[default]
    Auto,
    Control,
    Super,
}

/// How the trigger character and search text are removed from host text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerRemoval {
    /// Remove exactly the tracked search text ending at the caret.
    #[default]
    SuffixAnchored,
    /// Remove from the last trigger before the caret back to the caret,
    /// provided the trigger starts a word.
    WhitespaceBounded,
}

impl PanelSettings {
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    pub fn is_trigger(&self, c: char) -> bool {
        self.trigger_chars.contains(&c)
    }

    /// Load settings from the default location.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = settings_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e.to_string())),
        };

        let settings: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("quickpanel"))
}

/// Get the path to settings.toml.
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.toml"))
}
