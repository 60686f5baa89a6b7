use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, error};

use crate::command::CommandRegistry;
use crate::config::MqttSettings;
use crate::queue::{HA_PREFIX, MessageQueue, MqttMessage};
use crate::transport::MqttTransport;

use super::{Mqtt, PublishCategory};

/// Where publishers put outgoing messages.
///
/// Topics are given without the base, which is added when the message is
/// sent. Every method is a no-op returning `None` while MQTT is disabled.
pub trait PublishOutbox {
    /// Queue `payload` on `topic` with an explicit retain flag.
    fn publish_retain(&mut self, topic: &str, payload: &str, retain: bool) -> Option<Rc<MqttMessage>>;

    /// The configured retain flag.
    fn default_retain(&self) -> bool;

    fn publish(&mut self, topic: &str, payload: &str) -> Option<Rc<MqttMessage>> {
        let retain = self.default_retain();
        self.publish_retain(topic, payload, retain)
    }

    /// Queue a JSON object. Empty objects and non-objects are not sent.
    fn publish_json_retain(&mut self, topic: &str, payload: &Value, retain: bool) -> Option<Rc<MqttMessage>> {
        let non_empty = payload.as_object().is_some_and(|o| !o.is_empty());
        if !non_empty {
            debug!("Not publishing empty JSON to {}", topic);
            return None;
        }
        match serde_json::to_string(payload) {
            Ok(text) => self.publish_retain(topic, &text, retain),
            Err(e) => {
                error!("Failed to serialize payload for {}: {}", topic, e);
                None
            }
        }
    }

    fn publish_json(&mut self, topic: &str, payload: &Value) -> Option<Rc<MqttMessage>> {
        let retain = self.default_retain();
        self.publish_json_retain(topic, payload, retain)
    }

    /// Queue a retained Home Assistant discovery document. `topic` is relative
    /// to `homeassistant/`; an empty object clears the entity.
    fn publish_ha(&mut self, topic: &str, payload: &Value) -> Option<Rc<MqttMessage>> {
        let full = format!("{HA_PREFIX}{topic}");
        match serde_json::to_string(payload) {
            Ok(text) => self.publish_retain(&full, &text, true),
            Err(e) => {
                error!("Failed to serialize discovery document for {}: {}", full, e);
                None
            }
        }
    }

    /// Queue an empty, non-retained payload, removing a retained message.
    fn publish_empty(&mut self, topic: &str) -> Option<Rc<MqttMessage>> {
        self.publish_retain(topic, "", false)
    }
}

/// [`PublishOutbox`] over a queue and a settings snapshot.
pub struct Outbox<'a> {
    queue: &'a mut MessageQueue,
    settings: &'a MqttSettings,
}

impl<'a> Outbox<'a> {
    pub fn new(queue: &'a mut MessageQueue, settings: &'a MqttSettings) -> Self {
        Self { queue, settings }
    }
}

impl PublishOutbox for Outbox<'_> {
    fn publish_retain(&mut self, topic: &str, payload: &str, retain: bool) -> Option<Rc<MqttMessage>> {
        if !self.settings.enabled {
            return None;
        }
        self.queue.enqueue_publish(topic, payload, retain)
    }

    fn default_retain(&self) -> bool {
        self.settings.retain
    }
}

impl<T: MqttTransport, C: CommandRegistry> PublishOutbox for Mqtt<T, C> {
    fn publish_retain(&mut self, topic: &str, payload: &str, retain: bool) -> Option<Rc<MqttMessage>> {
        self.outbox().publish_retain(topic, payload, retain)
    }

    fn default_retain(&self) -> bool {
        self.settings.retain
    }
}

/// A component that publishes through the core.
///
/// Every hook gets an outbox rather than the core itself, so producers cannot
/// reach the registry or the transport.
pub trait MqttProducer {
    /// A connection was established. Runs on every connect.
    fn on_connect(&mut self, _out: &mut dyn PublishOutbox) {}

    /// A fresh session needs the discovery documents again.
    fn reset_ha(&mut self, _out: &mut dyn PublishOutbox) {}

    /// Publish current values of `category`. `force` is set by the interval
    /// scheduler; on-change callers pass `false` and only send what changed.
    fn publish_values(&mut self, _category: PublishCategory, _force: bool, _out: &mut dyn PublishOutbox) {}
}
