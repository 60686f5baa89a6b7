use super::*;

fn settings() -> MqttSettings {
    MqttSettings::default()
}

fn value<'a>(
    value_type: DeviceValueType,
    tag: DeviceValueTag,
    device_type: DeviceType,
    entity: &'a str,
    uom: DeviceValueUom,
) -> SensorSpec<'a> {
    SensorSpec {
        value_type,
        tag,
        name: "selected temperature",
        device_type,
        entity,
        uom,
    }
}

#[test]
fn test_tagged_thermostat_sensor_nested() {
    let (topic, doc) = sensor_config(
        &settings(),
        &value(
            DeviceValueType::Int,
            DeviceValueTag::Hc1,
            DeviceType::Thermostat,
            "seltemp",
            DeviceValueUom::Degrees,
        ),
    );

    assert_eq!(topic, "sensor/ems-esp/thermostat_hc1_seltemp/config");
    assert_eq!(doc["uniq_id"], "thermostat_hc1_seltemp");
    assert_eq!(doc["~"], "ems-esp");
    assert_eq!(doc["stat_t"], "~/thermostat_data");
    assert_eq!(doc["val_tpl"], "{{value_json.hc1.seltemp}}");
    assert_eq!(doc["name"], "Thermostat hc1 selected temperature");
    assert_eq!(doc["unit_of_meas"], "°C");
    assert_eq!(doc["ic"], ICON_DEGREES);
    assert_eq!(doc["state_class"], "measurement");
    assert_eq!(doc["dev"]["ids"][0], "ems-esp-thermostat");
}

#[test]
fn test_tagged_sensor_single_topics() {
    let settings = MqttSettings {
        nested_format: NestedFormat::Single,
        ..settings()
    };
    let (_, doc) = sensor_config(
        &settings,
        &value(
            DeviceValueType::Int,
            DeviceValueTag::Hc2,
            DeviceType::Thermostat,
            "seltemp",
            DeviceValueUom::Degrees,
        ),
    );
    assert_eq!(doc["stat_t"], "~/thermostat_data_hc2");
    assert_eq!(doc["val_tpl"], "{{value_json.seltemp}}");
}

#[test]
fn test_boiler_never_nests() {
    let (_, doc) = sensor_config(
        &settings(),
        &value(
            DeviceValueType::Int,
            DeviceValueTag::DeviceDataWw,
            DeviceType::Boiler,
            "wwcurtemp",
            DeviceValueUom::Degrees,
        ),
    );
    assert_eq!(doc["uniq_id"], "boiler_ww_wwcurtemp");
    assert_eq!(doc["stat_t"], "~/boiler_data_ww");
    assert_eq!(doc["val_tpl"], "{{value_json.wwcurtemp}}");
}

#[test]
fn test_bool_is_binary_sensor() {
    let (topic, doc) = sensor_config(
        &settings(),
        &value(
            DeviceValueType::Bool,
            DeviceValueTag::None,
            DeviceType::Boiler,
            "heatingactive",
            DeviceValueUom::None,
        ),
    );
    assert_eq!(topic, "binary_sensor/ems-esp/boiler_heatingactive/config");
    assert_eq!(doc["payload_on"], PAYLOAD_ON);
    assert_eq!(doc["payload_off"], PAYLOAD_OFF);
    assert!(doc.get("unit_of_meas").is_none());
    assert!(doc.get("state_class").is_none());
}

#[test]
fn test_time_units_get_icon_without_state_class() {
    let (_, doc) = sensor_config(
        &settings(),
        &value(
            DeviceValueType::Ulong,
            DeviceValueTag::None,
            DeviceType::Boiler,
            "burnworkmin",
            DeviceValueUom::Minutes,
        ),
    );
    assert_eq!(doc["unit_of_meas"], "minutes");
    assert_eq!(doc["ic"], ICON_TIME);
    assert!(doc.get("state_class").is_none());
}

#[test]
fn test_unitless_numbers_get_counter_icon() {
    let (_, numeric) = sensor_config(
        &settings(),
        &value(
            DeviceValueType::Ulong,
            DeviceValueTag::None,
            DeviceType::Boiler,
            "burnstarts",
            DeviceValueUom::None,
        ),
    );
    assert_eq!(numeric["ic"], ICON_NUM);
    assert!(numeric.get("unit_of_meas").is_none());

    let (_, text) = sensor_config(
        &settings(),
        &value(
            DeviceValueType::Text,
            DeviceValueTag::None,
            DeviceType::Boiler,
            "servicecode",
            DeviceValueUom::None,
        ),
    );
    assert!(text.get("ic").is_none());
}

#[test]
fn test_system_sensor_uses_system_device() {
    let sensors = heartbeat_sensors(false);
    let rssi = sensors.iter().find(|s| s.entity == "rssi").unwrap();
    let (topic, doc) = sensor_config(&settings(), rssi);
    assert_eq!(topic, "sensor/ems-esp/system_rssi/config");
    assert_eq!(doc["stat_t"], "~/heartbeat");
    assert_eq!(doc["dev"]["ids"][0], SYSTEM_DEVICE_ID);
    assert_eq!(doc["ic"], ICON_DBM);
}

#[test]
fn test_ethernet_skips_wifi_sensors() {
    let wifi = heartbeat_sensors(false);
    let eth = heartbeat_sensors(true);
    assert_eq!(wifi.len(), eth.len() + 2);
    assert!(eth.iter().all(|s| s.entity != "rssi" && s.entity != "wifistrength"));
}

#[test]
fn test_system_status_document() {
    let (topic, doc) = system_status_config(&settings(), "3.1.0");
    assert_eq!(topic, "sensor/ems-esp/system/config");
    assert_eq!(doc["stat_t"], "~/heartbeat");
    assert_eq!(doc["dev"]["sw"], "3.1.0");
    assert_eq!(doc["dev"]["ids"][0], "ems-esp");
}

#[test]
fn test_measurement_units() {
    for uom in [
        DeviceValueUom::Degrees,
        DeviceValueUom::Percent,
        DeviceValueUom::Lmin,
        DeviceValueUom::Kwh,
        DeviceValueUom::Wh,
        DeviceValueUom::Ua,
        DeviceValueUom::Bar,
        DeviceValueUom::W,
        DeviceValueUom::Kw,
    ] {
        assert!(uom_icon(uom, DeviceValueType::Int).1, "{uom:?}");
    }
    for uom in [
        DeviceValueUom::Seconds,
        DeviceValueUom::Hours,
        DeviceValueUom::Kb,
        DeviceValueUom::Dbm,
    ] {
        let (icon, measurement) = uom_icon(uom, DeviceValueType::Int);
        assert!(icon.is_some());
        assert!(!measurement, "{uom:?}");
    }
}

#[test]
fn test_tag_to_topic() {
    let nested = settings();
    assert_eq!(
        tag_to_topic(&nested, DeviceType::System, DeviceValueTag::Heartbeat),
        "heartbeat"
    );
    assert_eq!(
        tag_to_topic(&nested, DeviceType::Mixer, DeviceValueTag::Hc1),
        "mixer_data"
    );
    assert_eq!(
        tag_to_topic(&nested, DeviceType::Boiler, DeviceValueTag::None),
        "boiler_data"
    );
}
