//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::warn;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "zenith";
const CONFIG_ENV_VAR: &str = "ZENITH_CONFIG_DIR";

pub const DEFAULT_KEY_PREFIX: &str = "zenith_";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Storage key prefix cannot be empty.")]
    EmptyKeyPrefix,
}

/// Unit label shown next to weights. Stored values are unit-less.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Kg => "kg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Case-insensitive lookup of a colour by name.
/// # Errors
/// Returns `Error::InvalidColor` for unknown names.
pub fn parse_color(name: &str) -> Result<StandardColor, Error> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| Error::InvalidColor(name.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Cyan".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Namespace prepended to every storage key.
    pub key_prefix: String,
    pub weight_unit: WeightUnit,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            weight_unit: WeightUnit::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Full storage key for `name` under the configured prefix.
    pub fn key(&self, name: &str) -> String {
        format!("{}{name}", self.key_prefix)
    }

    /// # Errors
    /// - `Error::EmptyKeyPrefix` if the prefix is blank.
    /// - `Error::InvalidColor` if the header colour is unknown.
    pub fn validate(&self) -> Result<(), Error> {
        if self.key_prefix.trim().is_empty() {
            return Err(Error::EmptyKeyPrefix);
        }
        parse_color(&self.theme.header_color)?;
        Ok(())
    }
}

/// Determines the path to the configuration file, creating its directory.
/// # Errors
/// Returns `Error` if no config directory can be determined or created.
pub fn get_config_path() -> Result<PathBuf, Error> {
    let config_dir = match std::env::var(CONFIG_ENV_VAR) {
        Ok(dir) => {
            let path = PathBuf::from(dir);
            if !path.is_dir() {
                warn!(
                    "{CONFIG_ENV_VAR} points to '{}', which is not a directory. Creating it.",
                    path.display()
                );
            }
            path
        }
        Err(_) => dirs::config_dir()
            .ok_or(Error::CannotDetermineConfigDir)?
            .join(APP_CONFIG_DIR),
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Loads the config, writing the defaults on first run.
/// # Errors
/// Returns `Error` if the file cannot be read, parsed or created.
pub fn load_config(config_path: &Path) -> Result<Config, Error> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path)?;
        Ok(toml::from_str(&content)?)
    } else {
        let config = Config::default();
        save_config(config_path, &config)?;
        Ok(config)
    }
}

/// # Errors
/// Returns `Error` if the config cannot be serialized or written.
pub fn save_config(config_path: &Path, config: &Config) -> Result<(), Error> {
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(config_path, toml::to_string_pretty(config)?)?;
    Ok(())
}
