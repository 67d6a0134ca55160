//! Compression configuration.
//!
//! Handles loading, validating, and merging `jpegfit.toml`. Stock defaults are
//! the base layer; a user file is merged on top, and command-line flags
//! override both.
//!
//! ## Config File Location
//!
//! `jpegfit.toml` in the working directory is picked up automatically. Use
//! `--config <FILE>` to point somewhere else. No file at all is fine: every
//! value has a default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! target_kb = 0         # Size budget per image in KB (0 = fixed quality)
//! quality = 85          # Quality used when target_kb is 0
//! min_quality = 10      # Lowest quality the size search may use
//! max_quality = 95      # Highest quality the size search may use
//!
//! [resize]
//! max_width = 0         # Bounding box width in px (0 = unbounded)
//! max_height = 0        # Bounding box height in px (0 = unbounded)
//! upscale = false       # Enlarge images smaller than the box
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [compression]
//! target_kb = 200
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DEFAULT_QUALITY, MAX_SEARCH_QUALITY, MIN_SEARCH_QUALITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "jpegfit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `jpegfit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size target and quality settings.
    pub compression: CompressionConfig,
    /// Bounding box settings.
    pub resize: ResizeConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.compression;
        for (key, value) in [
            ("quality", c.quality),
            ("min_quality", c.min_quality),
            ("max_quality", c.max_quality),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "compression.{key} must be 1-100"
                )));
            }
        }
        if c.min_quality > c.max_quality {
            return Err(ConfigError::Validation(
                "compression.min_quality must not exceed compression.max_quality".into(),
            ));
        }
        if self.resize.max_width < 0 || self.resize.max_height < 0 {
            return Err(ConfigError::Validation(
                "resize.max_width and resize.max_height must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Size target and quality settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Size budget per image in kilobytes. `0` (or less) encodes at `quality`.
    pub target_kb: i64,
    /// Quality used when no size target is set.
    pub quality: u8,
    /// Lower bound of the size search; also used when the target is unreachable.
    pub min_quality: u8,
    /// Upper bound of the size search.
    pub max_quality: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            target_kb: 0,
            quality: DEFAULT_QUALITY,
            min_quality: MIN_SEARCH_QUALITY,
            max_quality: MAX_SEARCH_QUALITY,
        }
    }
}

/// Bounding box settings. Zero means "unbounded" on that axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub max_width: i64,
    pub max_height: i64,
    /// Enlarge images smaller than the box until they touch it.
    pub upscale: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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

/// Read a config file as a raw TOML value.
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

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// With `explicit = Some(path)` the file must exist. Without it,
/// [`DEFAULT_CONFIG_FILE`] in `working_dir` is used when present and stock
/// defaults otherwise.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<Config, ConfigError> {
    let overlay = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            load_raw_config(path)?
        }
        None => load_raw_config(&working_dir.join(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `jpegfit.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# jpegfit configuration
# =====================
#
# Every key is optional. Delete what you don't need; missing keys fall back
# to the values shown here. Command-line flags override this file.

[compression]
# Size budget per output image, in kilobytes (1 KB = 1024 bytes).
# 0 disables the budget: every image is encoded once at `quality`.
# With a budget, jpegfit searches for the highest quality that fits.
# If even `min_quality` is too large, the min_quality output is kept anyway.
target_kb = 0

# JPEG quality (1-100) used when target_kb is 0.
quality = 85

# Quality range (1-100) searched when target_kb is set.
min_quality = 10
max_quality = 95

[resize]
# Bounding box in pixels. Images are scaled down to fit, keeping their
# aspect ratio. 0 leaves that axis unbounded; both 0 disables resizing.
max_width = 0
max_height = 0

# Also scale up images that are smaller than the box.
upscale = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.compression.target_kb, 0);
        assert_eq!(config.compression.quality, 85);
        assert_eq!(config.compression.min_quality, 10);
        assert_eq!(config.compression.max_quality, 95);
        assert_eq!(config.resize.max_width, 0);
        assert_eq!(config.resize.max_height, 0);
        assert!(!config.resize.upscale);
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn stock_toml_matches_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_reads_working_dir_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[compression]
target_kb = 200

[resize]
max_width = 1600
"#,
        );
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.compression.target_kb, 200);
        assert_eq!(config.compression.quality, 85);
        assert_eq!(config.resize.max_width, 1600);
        assert_eq!(config.resize.max_height, 0);
    }

    #[test]
    fn explicit_path_wins_over_working_dir() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[compression]\ntarget_kb = 1\n");
        let other = tmp.path().join("other.toml");
        fs::write(&other, "[compression]\ntarget_kb = 2\n").unwrap();

        let config = load_config(Some(&other), tmp.path()).unwrap();
        assert_eq!(config.compression.target_kb, 2);
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")), tmp.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "this is not toml [[[");
        let result = load_config(None, tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[compression]\ntarget_kbs = 5\n");
        assert!(load_config(None, tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[output]\ndir = \"out\"\n");
        assert!(load_config(None, tmp.path()).is_err());
    }

    #[test]
    fn validate_quality_zero() {
        let mut config = Config::default();
        config.compression.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_quality_too_high() {
        let mut config = Config::default();
        config.compression.max_quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_reversed_range() {
        let mut config = Config::default();
        config.compression.min_quality = 90;
        config.compression.max_quality = 40;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_negative_bounds() {
        let mut config = Config::default();
        config.resize.max_height = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn negative_target_is_allowed() {
        // ≤ 0 simply means "no target"
        let mut config = Config::default();
        config.compression.target_kb = -10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 5").unwrap();
        let merged = merge_toml(base, overlay);
        let t = merged.get("t").unwrap();
        assert_eq!(t.get("x").unwrap().as_integer(), Some(1));
        assert_eq!(t.get("y").unwrap().as_integer(), Some(5));
    }
}
