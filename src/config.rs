//! Comic configuration module.
//!
//! Handles loading, validating, and merging `comic.toml`. Configuration is
//! layered: stock defaults, then the config file, then command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! panel_size = [1024, 1024]  # Every panel image is resized to this
//! panels_per_row = 3
//! border = 20                # Margin around each panel, in pixels
//! caption_band = 80          # Extra height below each panel for the caption
//!
//! [font]
//! size = 40.0                # Caption font size in pixels
//! # path = "fonts/Comic.ttf" # Omit to search common system fonts
//!
//! [colors]
//! caption = "#000000"
//! background = "#ffffff"     # Tile background and empty grid cells, opaque
//!
//! [processing]
//! max_processes = 4          # Max parallel workers (omit for auto = CPU cores)
//!
//! [service]
//! base_url = "https://api.openai.com/v1"
//! chat_model = "gpt-4o"
//! image_model = "dall-e-3"
//! image_size = "1024x1024"
//! api_key_env = "OPENAI_API_KEY"
//! timeout_secs = 120
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::compose::{LayoutParams, check_layout, parse_hex_color};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Comic configuration loaded from `comic.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComicConfig {
    /// Panel geometry and grid shape.
    pub layout: LayoutConfig,
    /// Caption typeface.
    pub font: FontConfig,
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// AI service endpoints and models.
    pub service: ServiceConfig,
}

impl ComicConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [w, h] = self.layout.panel_size;
        if w == 0 || h == 0 {
            return Err(ConfigError::Validation(
                "layout.panel_size values must be non-zero".into(),
            ));
        }
        if self.layout.panels_per_row == 0 {
            return Err(ConfigError::Validation(
                "layout.panels_per_row must be at least 1".into(),
            ));
        }
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(ConfigError::Validation(
                "font.size must be a positive number".into(),
            ));
        }
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "service.timeout_secs must be non-zero".into(),
            ));
        }
        self.colors.caption_rgba()?;
        if self.colors.background_rgba()?.0[3] != u8::MAX {
            return Err(ConfigError::Validation(
                "colors.background must be opaque".into(),
            ));
        }
        // One panel fixes the strip width and the tile height; taller strips
        // are checked again once the panel count is known.
        check_layout(&self.layout_params()?, 1).map_err(|e| {
            ConfigError::Validation(format!(
                "layout.panel_size, border, caption_band and panels_per_row: {}",
                e
            ))
        })?;
        Ok(())
    }

    /// Geometry and colours for the compositor.
    pub fn layout_params(&self) -> Result<LayoutParams, ConfigError> {
        let [w, h] = self.layout.panel_size;
        Ok(LayoutParams {
            panel_size: (w, h),
            border: self.layout.border,
            caption_band: self.layout.caption_band,
            panels_per_row: self.layout.panels_per_row,
            caption_color: self.colors.caption_rgba()?,
            background: self.colors.background_rgba()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Size every panel image is normalised to, `[width, height]`.
    pub panel_size: [u32; 2],
    pub panels_per_row: u32,
    pub border: u32,
    pub caption_band: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let params = LayoutParams::default();
        Self {
            panel_size: [params.panel_size.0, params.panel_size.1],
            panels_per_row: params.panels_per_row,
            border: params.border,
            caption_band: params.caption_band,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub size: f32,
    /// TrueType/OpenType file. When absent, well-known system sans-serif
    /// fonts are searched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            path: None,
        }
    }
}

/// Caption and background colours as hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub caption: String,
    pub background: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            caption: "#000000".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

fn parse_color(key: &str, value: &str) -> Result<Rgba<u8>, ConfigError> {
    parse_hex_color(value).ok_or_else(|| {
        ConfigError::Validation(format!(
            "colors.{} must be #rgb, #rrggbb or #rrggbbaa, got {:?}",
            key, value
        ))
    })
}

impl ColorConfig {
    pub fn caption_rgba(&self) -> Result<Rgba<u8>, ConfigError> {
        parse_color("caption", &self.caption)
    }

    pub fn background_rgba(&self) -> Result<Rgba<u8>, ConfigError> {
        parse_color("background", &self.background)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compositing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Model that writes the script.
    pub chat_model: String,
    /// Model that renders panels.
    pub image_model: String,
    pub image_size: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ComicConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<ComicConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: ComicConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config: stock defaults, then `path` if it exists, then `cli`.
///
/// Rejects unknown keys and validates the result.
pub fn load_config(path: &Path, cli: Option<toml::Value>) -> Result<ComicConfig, ConfigError> {
    let base = stock_defaults_value();
    let file = load_raw_config(path)?;
    if file.is_none() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
    }
    resolve_config(base, file.into_iter().chain(cli))
}

/// Returns a fully-commented stock `comic.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Comic Strip Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--panels-per-row, --border, --font) override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Every rendered panel is resized to this [width, height] before layout.
panel_size = [1024, 1024]

# Tiles per grid row. The last row may be partially filled.
# The finished strip may be at most 65535 pixels on either side.
panels_per_row = 3

# Margin around each panel image, in pixels.
border = 20

# Extra height below each panel reserved for the caption, in pixels.
# Captions longer than the band overflow it; they are not clipped.
caption_band = 80

# ---------------------------------------------------------------------------
# Font
# ---------------------------------------------------------------------------
[font]
# Caption font size in pixels.
size = 40.0

# TrueType or OpenType file. When omitted, common system sans-serif fonts
# (DejaVu Sans, Liberation Sans, Arial) are searched.
# path = "fonts/Comic.ttf"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
# Hex colours: #rgb, #rrggbb or #rrggbbaa. The background must be opaque.
[colors]
caption = "#000000"
background = "#ffffff"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for tile composition.
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4

# ---------------------------------------------------------------------------
# Service
# ---------------------------------------------------------------------------
[service]
# OpenAI-compatible API root.
base_url = "https://api.openai.com/v1"

# Model that turns the story into a script.
chat_model = "gpt-4o"

# Model that renders each panel, and the size it renders at.
image_model = "dall-e-3"
image_size = "1024x1024"

# Environment variable holding the API key.
api_key_env = "OPENAI_API_KEY"

# Per-request timeout in seconds. Requests are not retried.
timeout_secs = 120
"##
}
