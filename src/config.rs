//! Pipeline configuration.
//!
//! Loads, merges, and validates `photo-variants.toml`. Stock defaults are the
//! base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! input = "_raw"                # Source photos (flat directory)
//! output = "_processed"         # Variants + manifest.json
//! records = "content/photos"    # One YAML record per photo
//!
//! [widths]
//! standard = [2400, 1600, 1080, 750, 640]
//! policy = "strict"             # or "native-aware"
//!
//! [placeholder]
//! width = 20                    # LQIP width in pixels
//! quality = 20                  # LQIP WebP quality, 1-100
//!
//! [webp]
//! quality = 82                  # 1-100
//!
//! [avif]
//! quality = 72                  # 1-100
//! speed = 6                     # 1 (slowest) - 10 (fastest)
//!
//! [records]
//! base_url = "/photos"          # Record url = {base_url}/{slug}
//! ```
//!
//! The same `[widths]` section drives both the generator and the selector,
//! so the widths one produces are the widths the other asks for.
//!
//! Unknown keys are rejected to catch typos early.

use crate::widths::{StandardWidths, WidthPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "photo-variants.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full pipeline configuration.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub widths: WidthsConfig,
    pub placeholder: PlaceholderConfig,
    pub webp: WebpConfig,
    pub avif: AvifConfig,
    pub records: RecordsConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// Width lists are already checked while deserializing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.webp.quality) {
            return Err(ConfigError::Validation("webp.quality must be 1-100".into()));
        }
        if !(1..=100).contains(&self.placeholder.quality) {
            return Err(ConfigError::Validation(
                "placeholder.quality must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.avif.quality) {
            return Err(ConfigError::Validation("avif.quality must be 1-100".into()));
        }
        if !(1..=10).contains(&self.avif.speed) {
            return Err(ConfigError::Validation("avif.speed must be 1-10".into()));
        }
        if self.placeholder.width == 0 {
            return Err(ConfigError::Validation(
                "placeholder.width must be non-zero".into(),
            ));
        }
        if self.paths.input.is_empty() || self.paths.output.is_empty() {
            return Err(ConfigError::Validation(
                "paths.input and paths.output must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub input: String,
    pub output: String,
    pub records: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: "_raw".to_string(),
            output: "_processed".to_string(),
            records: "content/photos".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidthsConfig {
    /// Breakpoints in any order; stored descending.
    pub standard: StandardWidths,
    pub policy: WidthPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub quality: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 20,
            quality: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebpConfig {
    pub quality: u32,
}

impl Default for WebpConfig {
    fn default() -> Self {
        Self { quality: 82 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvifConfig {
    pub quality: u32,
    pub speed: u8,
}

impl Default for AvifConfig {
    fn default() -> Self {
        Self {
            quality: 72,
            speed: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordsConfig {
    /// Prefix of every record's `url`; the slug is appended.
    pub base_url: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            base_url: "/photos".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PipelineConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   overridden `standard` list is taken as a whole.
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

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to stock defaults when it
/// doesn't exist.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-variants configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Directories (relative to the working directory). CLI flags override these.
# ---------------------------------------------------------------------------
[paths]
# Flat directory of source photos (jpg, jpeg, png, tif, tiff, webp).
input = "_raw"
# Variants land in {output}/{slug}/{slug}-{width}.{webp|avif},
# plus {output}/manifest.json. Must not contain the input directory.
output = "_processed"
# Where `records` writes one {slug}.yaml per photo.
records = "content/photos"

# ---------------------------------------------------------------------------
# Breakpoints shared by the generator and the selector.
# ---------------------------------------------------------------------------
[widths]
# Any order; no zeros, no duplicates.
standard = [2400, 1600, 1080, 750, 640]
# "strict": only standard widths are generated and requested.
# "native-aware": a photo whose width falls strictly between two
# breakpoints also gets a variant at its own width, and that variant
# is the one requested.
policy = "strict"

# ---------------------------------------------------------------------------
# Low-quality placeholder embedded in the manifest as a data URI.
# ---------------------------------------------------------------------------
[placeholder]
width = 20
# Lossy WebP, 1-100. Kept low: the placeholder is shown blurred.
quality = 20

# ---------------------------------------------------------------------------
# Lossy encoders for the variants.
# ---------------------------------------------------------------------------
[webp]
# 1-100, higher is better quality and larger files.
quality = 82

[avif]
# 1-100, higher is better quality and larger files.
quality = 72
# 1 (slowest, smallest) to 10 (fastest).
speed = 6

# ---------------------------------------------------------------------------
# Content records.
# ---------------------------------------------------------------------------
[records]
# Each record's url is {base_url}/{slug}; variant URLs append
# /{slug}-{width}.{format}. Point this at wherever `output` is served.
base_url = "/photos"
"##
}
