//! INI configuration file
//!
//! Layer settings persist in `<config_dir>/osmlayer/config.ini`:
//!
//! ```ini
//! [overpass]
//! endpoint = http://overpass-api.de/api/
//! query = (node(BBOX)[organic];node(BBOX)[second_hand];);out qt;
//! min_zoom = 15
//! timeout_secs = 30
//!
//! [features]
//! area_tags = leisure, tourism, landuse, natural, sport
//! uninteresting_tags = source, source_ref, created_by
//!
//! [indicator]
//! no_layer = no layer assigned
//! template = current Zoom-Level: CURRENTZOOM all data at Level: MINZOOMLEVEL
//!
//! [logging]
//! debug = false
//! ```
//!
//! Missing keys fall back to the defaults of [`LayerConfig`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::layer::{IndicatorMessages, LayerConfig};

/// Directory under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "osmlayer";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

const SECTION_OVERPASS: &str = "overpass";
const SECTION_FEATURES: &str = "features";
const SECTION_INDICATOR: &str = "indicator";
const SECTION_LOGGING: &str = "logging";

/// Errors from reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory.
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    /// The file exists but could not be read or parsed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value does not parse as the expected type.
    #[error("Invalid value for [{section}] {key}: '{value}'")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

/// Default location of the configuration file.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Persisted layer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub config: LayerConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            config: LayerConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Wrap a layer configuration.
    pub fn new(config: LayerConfig) -> Self {
        Self { config }
    }

    /// Load from the default location, or defaults when there is no file yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_ini(&ini)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)
    }

    /// The layer configuration these settings describe.
    pub fn to_layer_config(&self) -> LayerConfig {
        self.config.clone()
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = LayerConfig::default();

        if let Some(section) = ini.section(Some(SECTION_OVERPASS)) {
            if let Some(endpoint) = section.get("endpoint") {
                config = config.with_endpoint(endpoint.trim());
            }
            if let Some(query) = section.get("query") {
                config = config.with_query(query.trim());
            }
            if let Some(value) = section.get("min_zoom") {
                config.min_zoom = parse_value(SECTION_OVERPASS, "min_zoom", value)?;
            }
            if let Some(value) = section.get("timeout_secs") {
                config.request_timeout_secs = parse_value(SECTION_OVERPASS, "timeout_secs", value)?;
            }
        }

        if let Some(section) = ini.section(Some(SECTION_FEATURES)) {
            if let Some(value) = section.get("area_tags") {
                config.area_tags = parse_list(value);
            }
            if let Some(value) = section.get("uninteresting_tags") {
                config.uninteresting_tags = parse_list(value);
            }
        }

        if let Some(section) = ini.section(Some(SECTION_INDICATOR)) {
            let defaults = IndicatorMessages::default();
            config.indicator_messages = IndicatorMessages {
                no_layer: section
                    .get("no_layer")
                    .map(|s| s.trim().to_string())
                    .unwrap_or(defaults.no_layer),
                template: section
                    .get("template")
                    .map(|s| s.trim().to_string())
                    .unwrap_or(defaults.template),
            };
        }

        if let Some(section) = ini.section(Some(SECTION_LOGGING)) {
            if let Some(value) = section.get("debug") {
                config.debug = parse_value(SECTION_LOGGING, "debug", value)?;
            }
        }

        Ok(Self { config })
    }

    fn to_ini(&self) -> Ini {
        let config = &self.config;
        let mut ini = Ini::new();
        ini.with_section(Some(SECTION_OVERPASS))
            .set("endpoint", config.endpoint.as_str())
            .set("query", config.query.as_str())
            .set("min_zoom", config.min_zoom.to_string())
            .set("timeout_secs", config.request_timeout_secs.to_string());
        ini.with_section(Some(SECTION_FEATURES))
            .set("area_tags", config.area_tags.join(", "))
            .set("uninteresting_tags", config.uninteresting_tags.join(", "));
        ini.with_section(Some(SECTION_INDICATOR))
            .set("no_layer", config.indicator_messages.no_layer.as_str())
            .set("template", config.indicator_messages.template.as_str());
        ini.with_section(Some(SECTION_LOGGING))
            .set("debug", config.debug.to_string());
        ini
    }
}

fn parse_value<T: FromStr>(
    section: &'static str,
    key: &'static str,
    value: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        section,
        key,
        value: value.to_string(),
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
