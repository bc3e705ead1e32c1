use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};
use crate::locale::{MonthNames, DEFAULT_LOCALE};

const CONFIG_PATH_ENV_VAR: &str = "KALENDERBLATT_CONFIG_FILE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Font {
    pub name: String,
    /// Size in millimetres.
    pub size: f64,
}

impl Font {
    pub fn new(name: &str, size: f64) -> Self {
        Font {
            name: name.to_owned(),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Width of the week number strip left of the grid, in millimetres.
    pub header_width: f64,
    /// Line width of the grid, in points.
    pub border_width: f64,
    pub cell_font: Font,
    pub row_header_font: Font,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            header_width: 15.0,
            border_width: 1.0,
            cell_font: Font::new("OfficinaSansITC-Book", 4.0),
            row_header_font: Font::new("OfficinaSansITC-Medium", 8.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub tex_engine: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            program: "asy".to_owned(),
            tex_engine: "xelatex".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub style: Style,
    pub renderer: RendererConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locale: DEFAULT_LOCALE.to_owned(),
            style: Style::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.month_names()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::ConfigParse,
                &format!("Could not read '{}': {}", path.display(), err),
            )
        })?;

        Config::from_toml(&content).map_err(|err| {
            let msg = format!(
                "{} (in '{}')",
                err.message.as_deref().unwrap_or_default(),
                path.display()
            );
            err.with_msg(&msg)
        })
    }

    pub fn month_names(&self) -> Result<MonthNames> {
        MonthNames::for_locale(&self.locale)
    }
}

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("kalenderblatt").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".kalenderblatt.toml"));
    }

    locations
}

/// Loads `path` if given, otherwise the first existing file out of the
/// default locations. Falls back to the built-in defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::debug!("Loading config from '{}'", path.display());
        return Config::from_path(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(found) => {
            log::debug!("Loading config from '{}'", found.display());
            Config::from_path(&found)
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
