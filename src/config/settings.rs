use serde::Deserialize;

use crate::device::DeviceType;

/// Top-level configuration settings for the application.
///
/// Includes the MQTT core settings and the logging setup of the binary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub mqtt: MqttSettings,
    pub logging: LoggingSettings,
}

/// How device values are grouped into `<device>_data` payloads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NestedFormat {
    /// One `<device>_data` payload per device, tagged values nested inside.
    #[default]
    Nested,
    /// One `<device>_data_<tag>` payload per tag.
    Single,
}

/// Which per-command topics are subscribed in addition to `<base>/<device>`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeFormat {
    /// Only the device topic; the command is carried in the payload or topic tail.
    #[default]
    General,
    /// Also `<device>/<cmd>` for every subscribable command.
    Individual,
    /// Like `Individual`, and `<device>/hc1..hc4/<cmd>` for heating circuit commands.
    IndividualAllHc,
}

/// Snapshot of the MQTT settings the core works with.
///
/// Publish intervals are in seconds; `0` means publish on change.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MqttSettings {
    pub enabled: bool,
    pub base: String,
    pub qos: u8,
    pub retain: bool,
    pub ha_enabled: bool,
    pub nested_format: NestedFormat,
    pub subscribe_format: SubscribeFormat,
    pub publish_time_boiler: u16,
    pub publish_time_thermostat: u16,
    pub publish_time_solar: u16,
    pub publish_time_mixer: u16,
    pub publish_time_sensor: u16,
    pub publish_time_other: u16,
}

impl MqttSettings {
    /// Whether values of this device type are published as soon as they change
    /// rather than on a fixed interval.
    pub fn publish_on_change(&self, device_type: DeviceType) -> bool {
        let interval = match device_type {
            DeviceType::Boiler => self.publish_time_boiler,
            DeviceType::Thermostat => self.publish_time_thermostat,
            DeviceType::Solar => self.publish_time_solar,
            DeviceType::Mixer => self.publish_time_mixer,
            DeviceType::Sensor => self.publish_time_sensor,
            _ => self.publish_time_other,
        };
        interval == 0
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub mqtt: Option<PartialMqttSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialMqttSettings {
    pub enabled: Option<bool>,
    pub base: Option<String>,
    pub qos: Option<u8>,
    pub retain: Option<bool>,
    pub ha_enabled: Option<bool>,
    pub nested_format: Option<NestedFormat>,
    pub subscribe_format: Option<SubscribeFormat>,
    pub publish_time_boiler: Option<u16>,
    pub publish_time_thermostat: Option<u16>,
    pub publish_time_solar: Option<u16>,
    pub publish_time_mixer: Option<u16>,
    pub publish_time_sensor: Option<u16>,
    pub publish_time_other: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl PartialMqttSettings {
    /// Fill every missing value from `default`.
    pub fn merge(self, default: MqttSettings) -> MqttSettings {
        MqttSettings {
            enabled: self.enabled.unwrap_or(default.enabled),
            base: self.base.unwrap_or(default.base),
            qos: self.qos.unwrap_or(default.qos),
            retain: self.retain.unwrap_or(default.retain),
            ha_enabled: self.ha_enabled.unwrap_or(default.ha_enabled),
            nested_format: self.nested_format.unwrap_or(default.nested_format),
            subscribe_format: self.subscribe_format.unwrap_or(default.subscribe_format),
            publish_time_boiler: self.publish_time_boiler.unwrap_or(default.publish_time_boiler),
            publish_time_thermostat: self
                .publish_time_thermostat
                .unwrap_or(default.publish_time_thermostat),
            publish_time_solar: self.publish_time_solar.unwrap_or(default.publish_time_solar),
            publish_time_mixer: self.publish_time_mixer.unwrap_or(default.publish_time_mixer),
            publish_time_sensor: self.publish_time_sensor.unwrap_or(default.publish_time_sensor),
            publish_time_other: self.publish_time_other.unwrap_or(default.publish_time_other),
        }
    }
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base: "ems-esp".to_string(),
            qos: 0,
            retain: false,
            ha_enabled: false,
            nested_format: NestedFormat::Nested,
            subscribe_format: SubscribeFormat::General,
            publish_time_boiler: 10,
            publish_time_thermostat: 10,
            publish_time_solar: 10,
            publish_time_mixer: 10,
            publish_time_sensor: 10,
            publish_time_other: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            mqtt: MqttSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
