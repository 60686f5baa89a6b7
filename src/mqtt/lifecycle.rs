use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::command::CommandRegistry;
use crate::ha::{self, SensorSpec};
use crate::transport::{DisconnectReason, MqttTransport};

use super::{ConnectionState, INFO_TOPIC, Mqtt, PublishOutbox, STATUS_TOPIC};

impl<T: MqttTransport, C: CommandRegistry> Mqtt<T, C> {
    /// Load the settings and register the last will with the transport.
    ///
    /// The will is set once per process, and only when MQTT is enabled.
    pub fn start(&mut self) {
        self.load_settings();
        if !self.settings.enabled {
            info!("MQTT is disabled");
            return;
        }
        if self.initialized {
            return;
        }
        self.initialized = true;

        let will_topic = format!("{}/{}", self.settings.base, STATUS_TOPIC);
        self.transport.set_will(&will_topic, 1, true, "offline");
        debug!("Last will set on {}", will_topic);
    }

    /// The broker accepted the session.
    pub fn on_connect(&mut self) {
        if self.state == ConnectionState::Connected {
            return;
        }

        info!("MQTT connected");
        self.state = ConnectionState::Connected;
        self.connect_count += 1;

        self.load_settings();

        let info_doc = self.info_document();
        self.publish_json(INFO_TOPIC, &info_doc);

        if self.settings.ha_enabled {
            self.ha_status();
        }

        self.run_producers(|p, out| p.on_connect(out));

        self.resubscribe();
        self.run_producers(|p, out| p.reset_ha(out));

        self.publish_retain(STATUS_TOPIC, "online", true);

        self.queue.reset_fails();
    }

    /// The session ended. A publish still waiting for its ack is dropped.
    pub fn on_disconnect(&mut self, reason: DisconnectReason) {
        if self.state != ConnectionState::Connected {
            return;
        }
        self.state = ConnectionState::Disconnected;

        info!("MQTT disconnected: {}", reason);
        self.queue.on_disconnect();
    }

    fn info_document(&self) -> Value {
        let event = if self.connect_count == 1 { "start" } else { "reconnect" };

        let mut doc = Map::new();
        doc.insert("event".into(), event.into());
        doc.insert("version".into(), self.system.version.as_str().into());
        if let Some(ip) = &self.system.ip {
            doc.insert("ip".into(), ip.as_str().into());
        }
        if let Some(ipv6) = &self.system.ipv6 {
            doc.insert("ipv6".into(), ipv6.as_str().into());
        }
        Value::Object(doc)
    }

    /// Announce the controller itself to Home Assistant, with the sensors
    /// that read from its heartbeat.
    pub fn ha_status(&mut self) {
        let (topic, doc) = ha::system_status_config(&self.settings, &self.system.version);
        self.publish_ha(&topic, &doc);

        for sensor in ha::heartbeat_sensors(self.system.ethernet) {
            self.publish_ha_sensor(&sensor);
        }
    }

    /// Queue the discovery document of one device value.
    pub fn publish_ha_sensor(&mut self, sensor: &SensorSpec<'_>) {
        // values without a display name are not exposed
        if sensor.name.is_empty() {
            return;
        }
        let (topic, doc) = ha::sensor_config(&self.settings, sensor);
        self.publish_ha(&topic, &doc);
    }
}
