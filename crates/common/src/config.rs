//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VitrineError, VitrineResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pointer follower tuning.
    pub cursor: CursorSettings,

    /// Smooth scroll controller tuning.
    pub scroll: ScrollSettings,

    /// Frame pacing.
    pub frame: FrameSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Pointer follower parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorSettings {
    /// Fraction of the remaining distance the ring closes per frame.
    pub position_factor: f64,

    /// Fraction of the remaining scale difference closed per frame.
    pub scale_factor: f64,

    /// Scale while not hovering an interactive element.
    pub rest_scale: f64,

    /// Scale while hovering an interactive element.
    pub hover_scale: f64,

    /// Half the ring's size in pixels; the ring is drawn centered on its position.
    pub ring_radius: f64,

    /// Half the dot's size in pixels.
    pub dot_radius: f64,

    /// Pointer y (px) below which the pointer counts as over the navbar.
    pub navbar_height: f64,

    /// How long the ring stays highlighted after a section change.
    pub flash_ms: u64,
}

/// Smooth scroll parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    /// Per-frame lerp applied to wheel-driven scrolling.
    pub wheel_lerp: f64,

    /// Default duration of programmatic scrolls (seconds).
    pub scroll_to_duration_secs: f64,

    /// Offset applied when scrolling to a section (keeps it clear of the navbar).
    pub section_offset: f64,

    /// Scroll offset after which the navbar switches to its compact style.
    pub navbar_scrolled_threshold: f64,
}

/// Frame pacing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Display refresh rate the stage is driven at.
    pub refresh_hz: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vitrine_motion_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Append log records to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self {
            position_factor: 0.12,
            scale_factor: 0.1,
            rest_scale: 1.0,
            hover_scale: 1.5,
            ring_radius: 20.0,
            dot_radius: 4.0,
            navbar_height: 100.0,
            flash_ms: 150,
        }
    }
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            wheel_lerp: 0.1,
            scroll_to_duration_secs: 1.2,
            section_offset: -80.0,
            navbar_scrolled_threshold: 50.0,
        }
    }
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self { refresh_hz: 60 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> VitrineResult<Self> {
        if !path.exists() {
            return Err(VitrineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the motion components cannot work with.
    pub fn validate(&self) -> VitrineResult<()> {
        let in_unit = |v: f64| v > 0.0 && v < 1.0;
        if !in_unit(self.cursor.position_factor) {
            return Err(VitrineError::config(format!(
                "cursor.position_factor must be in (0, 1), got {}",
                self.cursor.position_factor
            )));
        }
        if !in_unit(self.cursor.scale_factor) {
            return Err(VitrineError::config(format!(
                "cursor.scale_factor must be in (0, 1), got {}",
                self.cursor.scale_factor
            )));
        }
        if !in_unit(self.scroll.wheel_lerp) {
            return Err(VitrineError::config(format!(
                "scroll.wheel_lerp must be in (0, 1), got {}",
                self.scroll.wheel_lerp
            )));
        }
        if self.frame.refresh_hz == 0 {
            return Err(VitrineError::config("frame.refresh_hz must be positive"));
        }
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vitrine").join("config.json")
}
