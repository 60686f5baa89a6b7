//! Configuration loading.
//!
//! Settings come from an optional TOML file layered with `EMSMQTT__`-prefixed
//! environment variables, and are merged over defaults. The MQTT core does not
//! own its settings: it pulls a fresh [`MqttSettings`] snapshot from a
//! [`SettingsSource`] on every connect so live edits take effect.

mod settings;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;
use crate::utils::error::Result;

pub use settings::{
    LoggingSettings, MqttSettings, NestedFormat, PartialMqttSettings, Settings, SubscribeFormat,
};

/// Default location of the settings file, without extension.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
pub fn load_config() -> std::result::Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Same as [`load_config`] with an explicit settings file (extension optional).
/// A missing file is not an error.
pub fn load_config_from(path: impl AsRef<Path>) -> std::result::Result<Settings, ConfigError> {
    let path = path.as_ref().to_string_lossy();
    let builder = Config::builder()
        .add_source(File::with_name(&path).required(false))
        .add_source(
            Environment::with_prefix("EMSMQTT")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        mqtt: partial.mqtt.unwrap_or_default().merge(default.mqtt),
        logging: LoggingSettings {
            level: partial
                .logging
                .and_then(|l| l.level)
                .unwrap_or(default.logging.level),
        },
    })
}

/// Where the MQTT core reloads its settings from.
pub trait SettingsSource {
    fn load(&self) -> Result<MqttSettings>;
}

/// A fixed snapshot.
impl SettingsSource for MqttSettings {
    fn load(&self) -> Result<MqttSettings> {
        Ok(self.clone())
    }
}

/// A snapshot that the owner may edit between connects.
impl SettingsSource for RefCell<MqttSettings> {
    fn load(&self) -> Result<MqttSettings> {
        Ok(self.borrow().clone())
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for Rc<S> {
    fn load(&self) -> Result<MqttSettings> {
        (**self).load()
    }
}

/// Settings read from a file plus the environment on every load.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl SettingsSource for ConfigFile {
    fn load(&self) -> Result<MqttSettings> {
        Ok(load_config_from(&self.path)?.mqtt)
    }
}

#[cfg(test)]
mod tests;
