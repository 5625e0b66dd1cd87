//! Viewer settings with persistence
//!
//! Settings are saved to `~/.config/meshview/settings.toml`

use std::fs;
use std::path::PathBuf;

use meshview_core::{OscillatorConfig, SwayConfig, TimeConfig};
use meshview_render::{DisplayOptions, ViewMode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub display: DisplaySettings,
    pub animation: AnimationSettings,
    pub loader: LoaderSettings,
}

impl ViewerSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("meshview"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// How the model is drawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// View mode shown when the viewer starts
    pub initial_mode: ViewMode,
    /// Apply each node's world transform before merging
    pub bake_world_transforms: bool,
    #[serde(flatten)]
    pub options: DisplayOptions,
}

/// Per-frame transform animation of the model root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub enabled: bool,
    /// Start with the sway running
    pub sway_enabled: bool,
    pub time: TimeConfig,
    pub oscillator: OscillatorConfig,
    pub sway: SwayConfig,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sway_enabled: false,
            time: TimeConfig::default(),
            oscillator: OscillatorConfig::default(),
            sway: SwayConfig::default(),
        }
    }
}

/// Background model loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Threads of the loader's runtime
    pub worker_threads: usize,
    /// Seconds to wait for a model before giving up
    pub timeout_secs: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            timeout_secs: 60,
        }
    }
}
