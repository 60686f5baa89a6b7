use std::fmt;

use serde::Serialize;

use crate::command::CommandRegistry;
use crate::queue::{Operation, full_topic};
use crate::transport::MqttTransport;

use super::Mqtt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntryView {
    pub id: u16,
    pub operation: Operation,
    pub topic: String,
    pub payload: String,
    /// 0 when no ack is pending.
    pub packet_id: u16,
    pub retry_count: u8,
}

/// Snapshot of the core for the console and the web status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqttStatus {
    pub connected: bool,
    pub publish_fails: u32,
    pub subscriptions: Vec<String>,
    pub queue_capacity: usize,
    pub queue: Vec<QueueEntryView>,
}

impl fmt::Display for MqttStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MQTT is {}",
            if self.connected { "connected" } else { "disconnected" }
        )?;
        writeln!(f, "MQTT publish fails count: {}", self.publish_fails)?;
        writeln!(f)?;

        writeln!(f, "MQTT topic subscriptions:")?;
        for topic in &self.subscriptions {
            writeln!(f, " {topic}")?;
        }
        writeln!(f)?;

        if self.queue.is_empty() {
            return writeln!(f, "MQTT queue is empty");
        }
        writeln!(
            f,
            "MQTT queue ({}/{} messages):",
            self.queue.len(),
            self.queue_capacity
        )?;
        for entry in &self.queue {
            let payload = if entry.operation == Operation::Publish {
                entry.payload.as_str()
            } else {
                ""
            };
            write!(
                f,
                " [{:02}] ({}) topic={} payload={}",
                entry.id, entry.operation, entry.topic, payload
            )?;
            if entry.packet_id != 0 {
                write!(f, " (pid {})", entry.packet_id)?;
            }
            if entry.retry_count > 0 {
                write!(f, " (retries {})", entry.retry_count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: MqttTransport, C: CommandRegistry> Mqtt<T, C> {
    pub fn status(&self) -> MqttStatus {
        let base = &self.settings.base;
        MqttStatus {
            connected: self.connected(),
            publish_fails: self.queue.publish_fails(),
            subscriptions: self.subscribed_topics(),
            queue_capacity: self.queue.capacity(),
            queue: self
                .queue
                .iter()
                .map(|message| QueueEntryView {
                    id: message.id,
                    operation: message.operation,
                    topic: full_topic(base, &message.content.topic),
                    payload: message.content.payload.clone(),
                    packet_id: message.packet_id.map_or(0, |p| p.get()),
                    retry_count: message.retry_count,
                })
                .collect(),
        }
    }
}
