//! Application settings loading from config.toml
//!
//! Everything in the file is optional: a missing key falls back to its default, and a
//! missing file yields the full default configuration. Only a malformed file is an error.

use crate::core::honey::HoneyType;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable pointing at the configuration file.
pub const CONFIG_PATH_ENV: &str = "APIARY_CONFIG";

/// Shelf life applied to a harvest when nothing else is configured (two years).
pub const DEFAULT_SHELF_LIFE_DAYS: u64 = 730;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Database URL, overridden by `DATABASE_URL` when set
    pub database_url: Option<String>,
    /// Label printing settings
    pub labels: LabelSettings,
}

/// Everything the label builder and the rendering layer need besides the request itself.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LabelSettings {
    /// Days added to the harvest date to get the DLUO
    pub shelf_life_days: u64,
    /// Producer name printed on every label
    pub producer_name: String,
    /// Producer address printed on every label
    pub producer_address: String,
    /// Lot number abbreviation overrides, keyed by honey type key (e.g. `chestnut = "CHT"`)
    pub abbreviations: BTreeMap<String, String>,
    /// Sheet layout handed to the renderer
    pub layout: LabelLayout,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            shelf_life_days: DEFAULT_SHELF_LIFE_DAYS,
            producer_name: String::new(),
            producer_address: String::new(),
            abbreviations: BTreeMap::new(),
            layout: LabelLayout::default(),
        }
    }
}

impl LabelSettings {
    /// Lot number abbreviation for `honey_type`, honouring configured overrides.
    #[must_use]
    pub fn abbreviation_for(&self, honey_type: HoneyType) -> &str {
        self.abbreviations
            .get(honey_type.key())
            .map_or_else(|| honey_type.abbreviation(), String::as_str)
    }
}

/// Label sheet geometry, in millimetres.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LabelLayout {
    pub label_width_mm: f32,
    pub label_height_mm: f32,
    pub rows: u32,
    pub columns: u32,
    pub margin_top_mm: f32,
    pub margin_left_mm: f32,
    pub gap_mm: f32,
}

impl Default for LabelLayout {
    fn default() -> Self {
        // A4 sheet of 3 x 8 labels
        Self {
            label_width_mm: 70.0,
            label_height_mm: 37.0,
            rows: 8,
            columns: 3,
            margin_top_mm: 0.0,
            margin_left_mm: 0.0,
            gap_mm: 0.0,
        }
    }
}

impl LabelLayout {
    /// Number of labels that fit on one sheet.
    #[must_use]
    pub const fn labels_per_sheet(&self) -> u32 {
        self.rows * self.columns
    }
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or the configured values are unusable.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Parses configuration from TOML text and validates it.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration from `$APIARY_CONFIG` or `./config.toml`, falling back to
/// defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        warn!("No configuration file at {}, using defaults", path);
        return Ok(AppConfig::default());
    }
    load_config(path)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.labels.shelf_life_days == 0 {
        return Err(Error::Config {
            message: "labels.shelf_life_days must be positive".to_string(),
        });
    }
    let layout = &config.labels.layout;
    if layout.rows == 0 || layout.columns == 0 {
        return Err(Error::Config {
            message: "labels.layout needs at least one row and one column".to_string(),
        });
    }
    for (key, abbr) in &config.labels.abbreviations {
        key.parse::<HoneyType>().map_err(|_| Error::Config {
            message: format!("Unknown honey type '{key}' in labels.abbreviations"),
        })?;
        if abbr.trim().is_empty() || abbr.contains('-') {
            return Err(Error::Config {
                message: format!("Invalid lot abbreviation '{abbr}' for {key}"),
            });
        }
    }
    Ok(())
}
