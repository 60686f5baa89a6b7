use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::device::DeviceType;

fn write_config(dir: &TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("settings.toml");
    fs::write(&path, toml).expect("write config file");
    path
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert!(settings.mqtt.enabled);
    assert_eq!(settings.mqtt.base, "ems-esp");
    assert_eq!(settings.mqtt.qos, 0);
    assert!(!settings.mqtt.retain);
    assert!(!settings.mqtt.ha_enabled);
    assert_eq!(settings.mqtt.nested_format, NestedFormat::Nested);
    assert_eq!(settings.mqtt.subscribe_format, SubscribeFormat::General);
    assert_eq!(settings.mqtt.publish_time_boiler, 10);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let cfg = load_config_from(tmp.path().join("nope")).expect("load_config failed");
    assert_eq!(cfg, Settings::default());
}

#[test]
#[serial]
fn test_partial_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(
        &tmp,
        r#"
            [mqtt]
            base = "heating"
            qos = 1
            ha_enabled = true
            nested_format = "single"
            subscribe_format = "individual_all_hc"
            publish_time_boiler = 0

            [logging]
            level = "debug"
        "#,
    );

    let cfg = load_config_from(&path).expect("load_config failed");
    assert_eq!(cfg.mqtt.base, "heating");
    assert_eq!(cfg.mqtt.qos, 1);
    assert!(cfg.mqtt.ha_enabled);
    assert_eq!(cfg.mqtt.nested_format, NestedFormat::Single);
    assert_eq!(cfg.mqtt.subscribe_format, SubscribeFormat::IndividualAllHc);
    assert_eq!(cfg.mqtt.publish_time_boiler, 0);
    // untouched values keep their defaults
    assert!(cfg.mqtt.enabled);
    assert_eq!(cfg.mqtt.publish_time_thermostat, 10);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(&tmp, "[mqtt]\nbase = \"from-file\"\n");

    temp_env::with_vars(
        [
            ("EMSMQTT__MQTT__BASE", Some("from-env")),
            ("EMSMQTT__MQTT__RETAIN", Some("true")),
        ],
        || {
            let cfg = load_config_from(&path).expect("load_config failed");
            assert_eq!(cfg.mqtt.base, "from-env");
            assert!(cfg.mqtt.retain);
        },
    );
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(&tmp, "[mqtt]\nqos = \"lots\"\n");
    assert!(load_config_from(&path).is_err());
    assert!(ConfigFile::new(&path).load().is_err());
}

#[test]
#[serial]
fn test_config_file_source_rereads_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(&tmp, "[mqtt]\nbase = \"first\"\n");
    let source = ConfigFile::new(&path);
    assert_eq!(source.load().unwrap().base, "first");

    fs::write(&path, "[mqtt]\nbase = \"second\"\n").unwrap();
    assert_eq!(source.load().unwrap().base, "second");
}

#[test]
fn test_shared_source_sees_edits() {
    let shared = Rc::new(RefCell::new(MqttSettings::default()));
    let source: Rc<RefCell<MqttSettings>> = shared.clone();
    shared.borrow_mut().base = "edited".to_string();
    assert_eq!(source.load().unwrap().base, "edited");
}

#[test]
fn test_publish_on_change_follows_category_interval() {
    let settings = MqttSettings {
        publish_time_boiler: 0,
        publish_time_other: 0,
        ..MqttSettings::default()
    };
    assert!(settings.publish_on_change(DeviceType::Boiler));
    assert!(!settings.publish_on_change(DeviceType::Thermostat));
    assert!(!settings.publish_on_change(DeviceType::Solar));
    assert!(settings.publish_on_change(DeviceType::Heatpump));
    assert!(!settings.publish_on_change(DeviceType::Sensor));
}
