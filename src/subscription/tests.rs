use std::cell::Cell;
use std::rc::Rc;

use super::*;

#[test]
fn test_registry_new() {
    let registry = SubscriptionRegistry::new();
    assert!(registry.is_empty());
}

#[test]
fn test_register_adds_once_per_device_and_topic() {
    let mut registry = SubscriptionRegistry::new();
    assert!(registry.register(DeviceType::Boiler, "boiler", Handler::CommandConvention));
    assert!(!registry.register(DeviceType::Boiler, "boiler", Handler::CommandConvention));
    assert_eq!(registry.len(), 1);

    // same topic for another device is a separate entry
    assert!(registry.register(DeviceType::System, "boiler", Handler::CommandConvention));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_reregister_updates_callback() {
    let mut registry = SubscriptionRegistry::new();
    let hits = Rc::new(Cell::new(0));

    registry.register(DeviceType::System, "shower", Handler::CommandConvention);
    let counter = hits.clone();
    registry.register(
        DeviceType::System,
        "shower",
        Handler::explicit(move |_| {
            counter.set(counter.get() + 1);
            true
        }),
    );

    let entry = registry.find_mut("shower").unwrap();
    match &mut entry.handler {
        Handler::Explicit(cb) => assert!(cb("on")),
        Handler::CommandConvention => panic!("callback was not installed"),
    }
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_convention_does_not_replace_callback() {
    let mut registry = SubscriptionRegistry::new();
    registry.register(DeviceType::System, "system", Handler::explicit(|_| true));
    registry.register(DeviceType::System, "system", Handler::CommandConvention);

    let entry = registry.find_mut("system").unwrap();
    assert!(matches!(entry.handler, Handler::Explicit(_)));
}

#[test]
fn test_find_matches_topic_across_devices() {
    let mut registry = SubscriptionRegistry::new();
    registry.register(DeviceType::Thermostat, "thermostat", Handler::CommandConvention);
    let entry = registry.find_mut("thermostat").unwrap();
    assert_eq!(entry.device_type, DeviceType::Thermostat);
    assert!(registry.find_mut("mixer").is_none());
}

#[test]
fn test_topics_for_device() {
    let mut registry = SubscriptionRegistry::new();
    registry.register(DeviceType::Boiler, "boiler", Handler::CommandConvention);
    registry.register(DeviceType::System, "system", Handler::CommandConvention);
    registry.register(DeviceType::Boiler, "boiler_extra", Handler::CommandConvention);

    let topics: Vec<&str> = registry.topics_for(DeviceType::Boiler).collect();
    assert_eq!(topics, vec!["boiler", "boiler_extra"]);
    assert!(registry.contains(DeviceType::System, "system"));
    assert!(!registry.contains(DeviceType::Boiler, "system"));
}
