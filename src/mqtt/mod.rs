//! The MQTT context object.
//!
//! [`Mqtt`] owns everything the core mutates: the outbound queue, the
//! subscription registry, the connection state and counters, and the current
//! settings snapshot. It is driven from a single thread by two inputs: the
//! periodic [`Mqtt::loop_once`] and the transport's [`MqttEvent`]s, consumed by
//! [`Mqtt::handle_event`].
//!
//! Producers outside the core (shower, heartbeat, device values) plug in as
//! [`MqttProducer`]s and publish through the [`PublishOutbox`] they are handed.

mod dispatch;
mod lifecycle;
mod outbox;
mod schedule;
mod status;
mod subscribe;

use tracing::warn;

use crate::command::CommandRegistry;
use crate::config::{MqttSettings, SettingsSource};
use crate::device::DeviceType;
use crate::queue::MessageQueue;
use crate::subscription::SubscriptionRegistry;
use crate::transport::{MqttEvent, MqttTransport};

pub use dispatch::DispatchError;
pub use outbox::{MqttProducer, Outbox, PublishOutbox};
pub use schedule::{PublishCategory, PublishSchedule};
pub use status::{MqttStatus, QueueEntryView};

/// Topic (below the base) answered on when an inbound command fails.
pub const RESPONSE_TOPIC: &str = "response";
/// Topic (below the base) of the start/reconnect announcement.
pub const INFO_TOPIC: &str = "info";
/// Topic (below the base) of the online/offline marker and last will.
pub const STATUS_TOPIC: &str = "status";

/// Facts about the controller announced on connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub version: String,
    pub ip: Option<String>,
    pub ipv6: Option<String>,
    /// Wired network; WiFi signal sensors are not announced.
    pub ethernet: bool,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            ip: None,
            ipv6: None,
            ethernet: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// The MQTT core over transport `T` and command registry `C`.
pub struct Mqtt<T, C> {
    transport: T,
    commands: C,
    settings_source: Box<dyn SettingsSource>,
    settings: MqttSettings,
    queue: MessageQueue,
    subscriptions: SubscriptionRegistry,
    producers: Vec<Box<dyn MqttProducer>>,
    system: SystemInfo,
    state: ConnectionState,
    connect_count: u32,
    initialized: bool,
    last_poll: Option<u64>,
    schedule: PublishSchedule,
}

impl<T: MqttTransport, C: CommandRegistry> Mqtt<T, C> {
    pub fn new(transport: T, commands: C, settings_source: impl SettingsSource + 'static) -> Self {
        Self::with_queue(transport, commands, settings_source, MessageQueue::new())
    }

    /// Like [`new`](Self::new) with a caller-sized queue.
    pub fn with_queue(
        transport: T,
        commands: C,
        settings_source: impl SettingsSource + 'static,
        queue: MessageQueue,
    ) -> Self {
        let mut mqtt = Self {
            transport,
            commands,
            settings_source: Box::new(settings_source),
            settings: MqttSettings::default(),
            queue,
            subscriptions: SubscriptionRegistry::new(),
            producers: Vec::new(),
            system: SystemInfo::default(),
            state: ConnectionState::Disconnected,
            connect_count: 0,
            initialized: false,
            last_poll: None,
            schedule: PublishSchedule::default(),
        };
        mqtt.load_settings();
        mqtt
    }

    /// Refresh the settings snapshot. On failure the previous snapshot stays.
    pub fn load_settings(&mut self) {
        match self.settings_source.load() {
            Ok(settings) => self.settings = settings,
            Err(e) => warn!("Keeping previous MQTT settings: {}", e),
        }
    }

    /// Dispatch one transport notification.
    pub fn handle_event(&mut self, event: MqttEvent) {
        match event {
            MqttEvent::Connected => self.on_connect(),
            MqttEvent::Disconnected(reason) => self.on_disconnect(reason),
            MqttEvent::Message { topic, payload } => self.on_message(&topic, &payload),
            MqttEvent::PublishAck(packet_id) => self.on_publish(packet_id),
        }
    }

    /// Send the head of the queue, if the link is up.
    pub fn process_queue(&mut self) {
        if !self.connected() {
            return;
        }
        self.queue
            .process(&mut self.transport, &self.settings.base, self.settings.qos);
    }

    /// The broker acknowledged a publish.
    pub fn on_publish(&mut self, packet_id: u16) {
        self.queue.on_ack(packet_id);
    }

    /// Force a reconnect, e.g. after the settings were edited.
    pub fn reset_mqtt(&mut self) {
        if self.transport.connected() {
            self.transport.disconnect();
        }
    }

    pub fn add_producer(&mut self, producer: impl MqttProducer + 'static) {
        self.producers.push(Box::new(producer));
    }

    pub fn set_system_info(&mut self, system: SystemInfo) {
        self.system = system;
    }

    pub fn connected(&self) -> bool {
        self.transport.connected()
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count
    }

    pub fn publish_fails(&self) -> u32 {
        self.queue.publish_fails()
    }

    /// Whether `device_type` values go out on change rather than on an interval.
    pub fn publish_on_change(&self, device_type: DeviceType) -> bool {
        self.settings.publish_on_change(device_type)
    }

    pub fn settings(&self) -> &MqttSettings {
        &self.settings
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn commands(&self) -> &C {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut C {
        &mut self.commands
    }

    /// Publishing handle over the queue, honouring the current settings.
    pub fn outbox(&mut self) -> Outbox<'_> {
        Outbox::new(&mut self.queue, &self.settings)
    }

    fn run_producers(&mut self, mut f: impl FnMut(&mut dyn MqttProducer, &mut dyn PublishOutbox)) {
        let mut out = Outbox::new(&mut self.queue, &self.settings);
        for producer in self.producers.iter_mut() {
            f(producer.as_mut(), &mut out);
        }
    }
}
