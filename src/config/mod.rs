//! Configuration file support for captionboard.
//!
//! Settings are loaded from `~/.config/captionboard/config.toml` (or a path
//! given on the command line) and cover the canvas size, text defaults, image
//! fetching, and export output.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{CanvasConfig, ExportConfig, FetchConfig, TextConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_CANVAS_SIDE: u32 = 8192;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 1024
/// height = 768
///
/// [text]
/// font_size = 32.0
/// color = [255, 255, 255]
///
/// [fetch]
/// cors_mode = "anonymous"
/// page_origin = "https://editor.example.com"
///
/// [export]
/// format = "png"
/// directory = "~/Pictures"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Canvas size and backdrop color
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Text tool defaults
    #[serde(default)]
    pub text: TextConfig,

    /// Background image fetching
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Export output
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by
    /// the default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width`, `canvas.height`: 1 - 8192
    /// - `text.font_size`: 8.0 - 200.0
    /// - `export.quality`: 0.0 - 1.0
    fn validate_and_clamp(&mut self) {
        for (name, side) in [
            ("width", &mut self.canvas.width),
            ("height", &mut self.canvas.height),
        ] {
            if !(1..=MAX_CANVAS_SIDE).contains(&*side) {
                log::warn!(
                    "Invalid canvas {} {}, clamping to 1-{} range",
                    name,
                    side,
                    MAX_CANVAS_SIDE
                );
                *side = (*side).clamp(1, MAX_CANVAS_SIDE);
            }
        }

        if !(8.0..=200.0).contains(&self.text.font_size) {
            log::warn!(
                "Invalid font_size {:.1}, clamping to 8.0-200.0 range",
                self.text.font_size
            );
            self.text.font_size = if self.text.font_size.is_nan() {
                crate::session::DEFAULT_FONT_SIZE
            } else {
                self.text.font_size.clamp(8.0, 200.0)
            };
        }

        let valid_weight = matches!(
            self.text.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .text
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.text.font_weight
            );
            self.text.font_weight = "normal".to_string();
        }

        if !matches!(
            self.text.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            log::warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                self.text.font_style
            );
            self.text.font_style = "normal".to_string();
        }

        if !(0.0..=1.0).contains(&self.export.quality) {
            log::warn!(
                "Invalid export quality {:.2}, clamping to 0.0-1.0 range",
                self.export.quality
            );
            self.export.quality = if self.export.quality.is_nan() {
                1.0
            } else {
                self.export.quality.clamp(0.0, 1.0)
            };
        }

        if self.export.file_name.trim().is_empty() {
            log::warn!("Empty export file_name, falling back to 'modified-image.png'");
            self.export.file_name = ExportConfig::default().file_name;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/captionboard/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("captionboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if
    /// no file exists there.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to the default location,
    /// creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the documented example config to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path,
    /// or the directory or file cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;
        Self::create_default_file_at(&config_path)?;
        Ok(config_path)
    }

    pub fn create_default_file_at(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(config_path, Self::example_toml())?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }

    /// The documented example configuration shipped with the binary.
    pub fn example_toml() -> &'static str {
        include_str!("../../config.example.toml")
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
