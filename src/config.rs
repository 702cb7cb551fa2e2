use crate::error::{PopupError, PopupResult};
use crate::loader::{DEFAULT_SWITCH_INTERVAL, LoaderConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// RGBA colour, written as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Colour = Colour::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Colour {
    type Err = PopupError;

    fn from_str(s: &str) -> PopupResult<Self> {
        let invalid = || PopupError::InvalidConfig(format!("'{}' is not a #RRGGBB[AA] colour", s));

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |index: usize| {
            u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
            a: if hex.len() == 8 { channel(3)? } else { 0xff },
        })
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PopupConfig {
    #[serde(default)]
    pub loader: LoaderSettings,
}

/// Defaults applied to every loader overlay unless a call overrides them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoaderSettings {
    #[serde(default = "default_switch_interval_ms")]
    pub switch_interval_ms: u64,
    #[serde(default = "default_loader_colour")]
    pub loader_colour: Colour,
    #[serde(default = "default_backdrop_colour")]
    pub backdrop_colour: Colour,
    #[serde(default = "default_text_colour")]
    pub text_colour: Colour,
    #[serde(default = "default_reasons")]
    pub reasons: Vec<String>,
}

fn default_switch_interval_ms() -> u64 {
    DEFAULT_SWITCH_INTERVAL.as_millis() as u64
}

fn default_loader_colour() -> Colour {
    Colour::rgb(0x51, 0x2B, 0xD4)
}

fn default_backdrop_colour() -> Colour {
    Colour::WHITE
}

fn default_text_colour() -> Colour {
    Colour::BLACK
}

fn default_reasons() -> Vec<String> {
    vec!["Loading...".to_string()]
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            switch_interval_ms: default_switch_interval_ms(),
            loader_colour: default_loader_colour(),
            backdrop_colour: default_backdrop_colour(),
            text_colour: default_text_colour(),
            reasons: default_reasons(),
        }
    }
}

impl PopupConfig {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("awaitable-popups")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".awaitable-popups")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PopupConfig = toml::from_str(content)?;
        // Reject unusable loader settings at load time rather than at first use.
        config.loader_config()?;
        debug!(
            "Loaded config with {} loader reasons",
            config.loader.reasons.len()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        debug!("Saving config to: {:?}", config_path);

        fs::write(&config_path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Loader configuration built from the stored defaults
    pub fn loader_config(&self) -> PopupResult<LoaderConfig> {
        let settings = &self.loader;
        Ok(LoaderConfig::new(settings.reasons.clone())?
            .with_switch_interval(Duration::from_millis(settings.switch_interval_ms))?
            .with_loader_colour(settings.loader_colour)
            .with_backdrop_colour(settings.backdrop_colour)
            .with_text_colour(settings.text_colour))
    }
}
