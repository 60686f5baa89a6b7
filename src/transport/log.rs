//! Log-only transport used by the binary while no broker client is wired in.
//!
//! Every packet is accepted and logged. QoS > 0 publishes are acknowledged
//! immediately through the event channel, so the full delivery path of the
//! core can be exercised without a broker.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::{DisconnectReason, MqttEvent, MqttTransport, PacketId};

pub struct LogTransport {
    connected: bool,
    last_packet_id: u16,
    will: Option<(String, String)>,
    events: UnboundedSender<MqttEvent>,
}

impl LogTransport {
    pub fn new(events: UnboundedSender<MqttEvent>) -> Self {
        Self {
            connected: false,
            last_packet_id: 0,
            will: None,
            events,
        }
    }

    /// Bring the link up and notify the core.
    pub fn connect(&mut self) {
        self.connected = true;
        self.notify(MqttEvent::Connected);
    }

    /// Topic and payload of the registered last will, if any.
    pub fn will(&self) -> Option<(&str, &str)> {
        self.will.as_ref().map(|(t, p)| (t.as_str(), p.as_str()))
    }

    fn next_packet_id(&mut self) -> PacketId {
        self.last_packet_id = self.last_packet_id.wrapping_add(1);
        if self.last_packet_id == 0 {
            self.last_packet_id = 1;
        }
        PacketId::new(self.last_packet_id).unwrap_or(PacketId::MIN)
    }

    fn notify(&self, event: MqttEvent) {
        if self.events.send(event).is_err() {
            warn!("mqtt(LOG): event receiver dropped");
        }
    }
}

impl MqttTransport for LogTransport {
    fn connected(&self) -> bool {
        self.connected
    }

    fn subscribe(&mut self, topic: &str, qos: u8) -> Option<PacketId> {
        if !self.connected {
            return None;
        }
        info!("mqtt(LOG): subscribing to {} (QoS{})", topic, qos);
        Some(self.next_packet_id())
    }

    fn publish(&mut self, topic: &str, qos: u8, retain: bool, payload: &str) -> Option<PacketId> {
        if !self.connected {
            return None;
        }
        let packet_id = self.next_packet_id();
        info!(
            "mqtt(LOG): publishing to {} len={} QoS{} retain={}",
            topic,
            payload.len(),
            qos,
            retain
        );
        debug!("mqtt(LOG): payload {}", payload);
        if qos > 0 {
            self.notify(MqttEvent::PublishAck(packet_id.get()));
        }
        Some(packet_id)
    }

    fn set_will(&mut self, topic: &str, qos: u8, retain: bool, payload: &str) {
        info!("mqtt(LOG): last will {} = {} (QoS{}, retain={})", topic, payload, qos, retain);
        self.will = Some((topic.to_string(), payload.to_string()));
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            self.notify(MqttEvent::Disconnected(DisconnectReason::TcpDisconnected));
        }
    }
}
