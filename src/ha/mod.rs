//! Home Assistant MQTT discovery documents.
//!
//! Pure builders: they turn a device value description into the retained
//! config document Home Assistant reads from
//! `homeassistant/<component>/<base>/<unique id>/config`. The returned topic is
//! relative to the `homeassistant/` prefix. `~` inside a document stands for
//! the base and is expanded by Home Assistant.
//!
//! Reference: https://www.home-assistant.io/integrations/mqtt/#mqtt-discovery

use serde_json::{Value, json};

use crate::config::{MqttSettings, NestedFormat};
use crate::device::{DeviceType, DeviceValueTag, DeviceValueType, DeviceValueUom};

/// HA device identifier of the controller itself.
pub const SYSTEM_DEVICE_ID: &str = "ems-esp";
pub const DEVICE_NAME: &str = "EMS-ESP";
pub const DEVICE_MANUFACTURER: &str = "proddy";

/// How booleans are rendered in state payloads.
pub const PAYLOAD_ON: &str = "on";
pub const PAYLOAD_OFF: &str = "off";

pub const ICON_DEVICE: &str = "mdi:home-thermometer-outline";
pub const ICON_DEGREES: &str = "mdi:coolant-temperature";
pub const ICON_PERCENT: &str = "mdi:percent-outline";
pub const ICON_TIME: &str = "mdi:clock-outline";
pub const ICON_KB: &str = "mdi:memory";
pub const ICON_LMIN: &str = "mdi:water-boiler";
pub const ICON_KWH: &str = "mdi:transmission-tower";
pub const ICON_UA: &str = "mdi:flash-triangle-outline";
pub const ICON_BAR: &str = "mdi:gauge";
pub const ICON_KW: &str = "mdi:omega";
pub const ICON_DBM: &str = "mdi:wifi-strength-2";
pub const ICON_NUM: &str = "mdi:counter";

/// Icon for a unit, and whether the value is a measurement (gets a
/// `state_class`).
pub fn uom_icon(uom: DeviceValueUom, value_type: DeviceValueType) -> (Option<&'static str>, bool) {
    match uom {
        DeviceValueUom::Degrees => (Some(ICON_DEGREES), true),
        DeviceValueUom::Percent => (Some(ICON_PERCENT), true),
        DeviceValueUom::Seconds | DeviceValueUom::Minutes | DeviceValueUom::Hours => {
            (Some(ICON_TIME), false)
        }
        DeviceValueUom::Kb => (Some(ICON_KB), false),
        DeviceValueUom::Lmin => (Some(ICON_LMIN), true),
        DeviceValueUom::Wh | DeviceValueUom::Kwh => (Some(ICON_KWH), true),
        DeviceValueUom::Ua => (Some(ICON_UA), true),
        DeviceValueUom::Bar => (Some(ICON_BAR), true),
        DeviceValueUom::W | DeviceValueUom::Kw => (Some(ICON_KW), true),
        DeviceValueUom::Dbm => (Some(ICON_DBM), false),
        DeviceValueUom::None if value_type.is_numeric() => (Some(ICON_NUM), false),
        DeviceValueUom::None => (None, false),
    }
}

/// Whether values of `device_type` are nested inside one `<device>_data`
/// payload. The boiler never nests.
pub fn is_nested(settings: &MqttSettings, device_type: DeviceType) -> bool {
    device_type != DeviceType::Boiler && settings.nested_format == NestedFormat::Nested
}

/// Topic (without base) carrying the values of `device_type` with `tag`.
pub fn tag_to_topic(settings: &MqttSettings, device_type: DeviceType, tag: DeviceValueTag) -> String {
    // the system device publishes under its own topics, e.g. heartbeat
    if device_type == DeviceType::System {
        return tag.mqtt_name().to_string();
    }

    let device = device_type.name();
    if tag.mqtt_name().is_empty() || is_nested(settings, device_type) {
        format!("{device}_data")
    } else {
        format!("{device}_data_{}", tag.mqtt_name())
    }
}

/// Description of one device value to announce.
#[derive(Debug, Clone, Copy)]
pub struct SensorSpec<'a> {
    pub value_type: DeviceValueType,
    pub tag: DeviceValueTag,
    pub name: &'a str,
    pub device_type: DeviceType,
    pub entity: &'a str,
    pub uom: DeviceValueUom,
}

/// Discovery document for a sensor or binary sensor.
///
/// Returns the topic below `homeassistant/` and the document.
pub fn sensor_config(settings: &MqttSettings, spec: &SensorSpec<'_>) -> (String, Value) {
    let device_name = spec.device_type.name();
    let tag = spec.tag.as_str();

    // entity qualified by the tag, e.g. hc1.seltemp
    let new_entity = if tag.is_empty() {
        spec.entity.to_string()
    } else {
        format!("{tag}.{}", spec.entity)
    };

    // dots would break HA entity ids
    let uniq = format!("{device_name}_{new_entity}").replace('.', "_");

    let name = if tag.is_empty() {
        format!("{device_name} {}", spec.name)
    } else {
        format!("{device_name} {tag} {}", spec.name)
    };

    let val_tpl = if is_nested(settings, spec.device_type) {
        format!("{{{{value_json.{new_entity}}}}}")
    } else {
        format!("{{{{value_json.{}}}}}", spec.entity)
    };

    let mut doc = json!({
        "~": settings.base,
        "uniq_id": uniq,
        "stat_t": format!("~/{}", tag_to_topic(settings, spec.device_type, spec.tag)),
        "name": capitalize(&name),
        "val_tpl": val_tpl,
    });

    let component = if spec.value_type == DeviceValueType::Bool {
        doc["payload_on"] = json!(PAYLOAD_ON);
        doc["payload_off"] = json!(PAYLOAD_OFF);
        "binary_sensor"
    } else {
        if spec.uom != DeviceValueUom::None {
            doc["unit_of_meas"] = json!(spec.uom.as_str());
        }
        let (icon, measurement) = uom_icon(spec.uom, spec.value_type);
        if let Some(icon) = icon {
            doc["ic"] = json!(icon);
        }
        if measurement {
            doc["state_class"] = json!("measurement");
        }
        "sensor"
    };

    let device_id = if spec.device_type == DeviceType::System {
        SYSTEM_DEVICE_ID.to_string()
    } else {
        format!("{SYSTEM_DEVICE_ID}-{device_name}")
    };
    doc["dev"] = json!({ "ids": [device_id] });

    let topic = format!("{component}/{}/{uniq}/config", settings.base);
    (topic, doc)
}

/// Discovery document of the controller's own status entity, fed by the
/// heartbeat.
pub fn system_status_config(settings: &MqttSettings, version: &str) -> (String, Value) {
    let doc = json!({
        "uniq_id": "ems-esp-system",
        "~": settings.base,
        "stat_t": "~/heartbeat",
        "name": "EMS-ESP status",
        "ic": ICON_DEVICE,
        "val_tpl": "{{value_json['status']}}",
        "dev": {
            "name": DEVICE_NAME,
            "sw": version,
            "mf": DEVICE_MANUFACTURER,
            "mdl": DEVICE_NAME,
            "ids": [SYSTEM_DEVICE_ID],
        },
    });
    (format!("sensor/{}/system/config", settings.base), doc)
}

/// Heartbeat values announced as system sensors. The WiFi values are only
/// meaningful when not on Ethernet.
pub fn heartbeat_sensors(ethernet: bool) -> Vec<SensorSpec<'static>> {
    let sensor = |name: &'static str, entity: &'static str, uom: DeviceValueUom| SensorSpec {
        value_type: DeviceValueType::Int,
        tag: DeviceValueTag::Heartbeat,
        name,
        device_type: DeviceType::System,
        entity,
        uom,
    };

    let mut sensors = Vec::new();
    if !ethernet {
        sensors.push(sensor("WiFi RSSI", "rssi", DeviceValueUom::Dbm));
        sensors.push(sensor("WiFi strength", "wifistrength", DeviceValueUom::Percent));
    }
    sensors.extend([
        sensor("Uptime", "uptime", DeviceValueUom::None),
        sensor("Uptime (sec)", "uptime_sec", DeviceValueUom::Seconds),
        sensor("Free memory", "freemem", DeviceValueUom::Kb),
        sensor("# MQTT fails", "mqttfails", DeviceValueUom::None),
        sensor("# Rx received", "rxreceived", DeviceValueUom::None),
        sensor("# Rx fails", "rxfails", DeviceValueUom::None),
        sensor("# Tx reads", "txread", DeviceValueUom::None),
        sensor("# Tx writes", "txwrite", DeviceValueUom::None),
        sensor("# Tx fails", "txfails", DeviceValueUom::None),
    ]);
    sensors
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests;
