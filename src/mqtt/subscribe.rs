use tracing::debug;

use crate::command::{self, CommandFlags, CommandRegistry};
use crate::device::DeviceType;
use crate::queue::full_topic;
use crate::subscription::Handler;
use crate::transport::MqttTransport;

use super::Mqtt;

impl<T: MqttTransport, C: CommandRegistry> Mqtt<T, C> {
    /// Register `topic` (below the base) for `device_type`.
    ///
    /// A known topic only has its handler updated. A new one is subscribed at
    /// the broker when MQTT is enabled.
    pub fn subscribe(&mut self, device_type: DeviceType, topic: &str, handler: Handler) {
        if !self.subscriptions.register(device_type, topic, handler) {
            return;
        }
        if !self.settings.enabled {
            return;
        }
        debug!("Subscribing MQTT topic {} for device type {}", topic, device_type);
        self.queue_subscribe_message(topic);
    }

    /// Register a topic not tied to a device, like `system`.
    pub fn subscribe_generic(&mut self, topic: &str, handler: Handler) {
        self.subscribe(DeviceType::System, topic, handler);
    }

    /// Make `cmd` reachable over MQTT.
    ///
    /// The device topic always carries commands by name. Depending on the
    /// subscribe format, per-command topics are subscribed as well.
    pub fn register_command(&mut self, device_type: DeviceType, cmd: &str, flags: CommandFlags) {
        let device_topic = device_type.name();
        if !self.subscriptions.contains(device_type, device_topic) {
            debug!("Registering MQTT cmd {} with topic {}", cmd, device_topic);
            self.subscribe(device_type, device_topic, Handler::CommandConvention);
        }

        if !self.settings.enabled {
            return;
        }
        for topic in command::command_topics(self.settings.subscribe_format, device_type, cmd, flags) {
            self.queue_subscribe_message(&topic);
        }
    }

    /// Subscribe everything again, e.g. after the broker lost the session.
    pub fn resubscribe(&mut self) {
        for entry in self.subscriptions.iter() {
            self.queue.enqueue_subscribe(&entry.topic);
        }
        for info in self.commands.commands() {
            for topic in command::command_topics(
                self.settings.subscribe_format,
                info.device_type,
                &info.cmd,
                info.flags,
            ) {
                self.queue.enqueue_subscribe(&topic);
            }
        }
    }

    /// Queue a subscribe for `topic` (below the base).
    pub fn queue_subscribe_message(&mut self, topic: &str) {
        if self.queue.enqueue_subscribe(topic).is_none() {
            debug!("Not subscribing to an empty topic");
        }
    }

    /// Full topics registered for `device_type`.
    pub fn topic_handlers(&self, device_type: DeviceType) -> Vec<String> {
        self.subscriptions
            .topics_for(device_type)
            .map(|topic| full_topic(&self.settings.base, topic))
            .collect()
    }

    /// Every full topic the core subscribes to, registry entries first.
    pub fn subscribed_topics(&self) -> Vec<String> {
        let base = &self.settings.base;
        let mut topics: Vec<String> = self
            .subscriptions
            .iter()
            .map(|entry| full_topic(base, &entry.topic))
            .collect();
        for info in self.commands.commands() {
            topics.extend(
                command::command_topics(
                    self.settings.subscribe_format,
                    info.device_type,
                    &info.cmd,
                    info.flags,
                )
                .iter()
                .map(|topic| full_topic(base, topic)),
            );
        }
        topics
    }
}
