//! Device catalog: the closed set of device types, value types, tags and units
//! that topics and Home Assistant documents are built from.

use std::fmt;

use serde::Serialize;

/// The kinds of devices found on the heating bus, plus the controller itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    System,
    Boiler,
    Thermostat,
    Mixer,
    Solar,
    Heatpump,
    Switch,
    Controller,
    Connect,
    Gateway,
    Sensor,
    Generic,
}

impl DeviceType {
    /// Lowercase name used in topics, unique ids and discovery documents.
    pub fn name(self) -> &'static str {
        match self {
            DeviceType::System => "system",
            DeviceType::Boiler => "boiler",
            DeviceType::Thermostat => "thermostat",
            DeviceType::Mixer => "mixer",
            DeviceType::Solar => "solar",
            DeviceType::Heatpump => "heatpump",
            DeviceType::Switch => "switch",
            DeviceType::Controller => "controller",
            DeviceType::Connect => "connect",
            DeviceType::Gateway => "gateway",
            DeviceType::Sensor => "sensor",
            DeviceType::Generic => "generic",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a device value is stored, which decides the HA entity kind and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceValueType {
    Bool,
    Int,
    Uint,
    Short,
    Ushort,
    Ulong,
    Time,
    Enum,
    Text,
}

impl DeviceValueType {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DeviceValueType::Int
                | DeviceValueType::Uint
                | DeviceValueType::Short
                | DeviceValueType::Ushort
                | DeviceValueType::Ulong
        )
    }
}

/// Sub-grouping of a device's values (heating circuit, warm water circuit, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceValueTag {
    None,
    Heartbeat,
    BoilerData,
    DeviceDataWw,
    ThermostatData,
    Hc1,
    Hc2,
    Hc3,
    Hc4,
    Wwc1,
    Wwc2,
    Wwc3,
    Wwc4,
}

impl DeviceValueTag {
    /// Display form, used in entity names and nested value keys. Empty when the
    /// tag does not qualify the value.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceValueTag::None
            | DeviceValueTag::Heartbeat
            | DeviceValueTag::BoilerData
            | DeviceValueTag::ThermostatData => "",
            DeviceValueTag::DeviceDataWw => "ww",
            DeviceValueTag::Hc1 => "hc1",
            DeviceValueTag::Hc2 => "hc2",
            DeviceValueTag::Hc3 => "hc3",
            DeviceValueTag::Hc4 => "hc4",
            DeviceValueTag::Wwc1 => "wwc1",
            DeviceValueTag::Wwc2 => "wwc2",
            DeviceValueTag::Wwc3 => "wwc3",
            DeviceValueTag::Wwc4 => "wwc4",
        }
    }

    /// Topic suffix form, appended to `<device>_data` in single-topic mode.
    pub fn mqtt_name(self) -> &'static str {
        match self {
            DeviceValueTag::Heartbeat => "heartbeat",
            other => other.as_str(),
        }
    }
}

/// Unit of measure of a device value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceValueUom {
    None,
    Degrees,
    Percent,
    Lmin,
    Kwh,
    Wh,
    Hours,
    Minutes,
    Seconds,
    Ua,
    Bar,
    Kw,
    W,
    Kb,
    Dbm,
}

impl DeviceValueUom {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceValueUom::None => "",
            DeviceValueUom::Degrees => "°C",
            DeviceValueUom::Percent => "%",
            DeviceValueUom::Lmin => "l/min",
            DeviceValueUom::Kwh => "kWh",
            DeviceValueUom::Wh => "Wh",
            DeviceValueUom::Hours => "hours",
            DeviceValueUom::Minutes => "minutes",
            DeviceValueUom::Seconds => "seconds",
            DeviceValueUom::Ua => "µA",
            DeviceValueUom::Bar => "bar",
            DeviceValueUom::Kw => "kW",
            DeviceValueUom::W => "W",
            DeviceValueUom::Kb => "KB",
            DeviceValueUom::Dbm => "dBm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_names_are_lowercase_topic_segments() {
        assert_eq!(DeviceType::Boiler.name(), "boiler");
        assert_eq!(DeviceType::System.to_string(), "system");
        assert_eq!(DeviceType::Thermostat.name(), "thermostat");
    }

    #[test]
    fn test_heartbeat_tag_only_has_mqtt_form() {
        assert_eq!(DeviceValueTag::Heartbeat.as_str(), "");
        assert_eq!(DeviceValueTag::Heartbeat.mqtt_name(), "heartbeat");
        assert_eq!(DeviceValueTag::Hc2.mqtt_name(), "hc2");
        assert_eq!(DeviceValueTag::BoilerData.mqtt_name(), "");
    }

    #[test]
    fn test_numeric_value_types() {
        assert!(DeviceValueType::Ulong.is_numeric());
        assert!(!DeviceValueType::Bool.is_numeric());
        assert!(!DeviceValueType::Enum.is_numeric());
    }
}
