//! The outbound message queue and delivery manager.
//!
//! Every publish and subscribe request goes through one bounded FIFO. The queue
//! is drained one entry per tick, publishes are retried a bounded number of
//! times, and with QoS > 0 the head waits for its broker ack before the next
//! entry is sent. When full, the oldest entry is evicted to admit a new one.

pub mod message;

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, error};

use crate::transport::MqttTransport;

pub use message::{MqttMessage, Operation, QueuedMessage};

/// Capacity of the outbound queue.
pub const MAX_MQTT_MESSAGES: usize = 70;

/// Submission attempts for one publish before it is dropped.
pub const MQTT_PUBLISH_MAX_RETRY: u8 = 3;

/// Minimum time between two queue ticks, in milliseconds.
pub const MQTT_PUBLISH_WAIT: u64 = 200;

/// Topics starting with this prefix are sent as-is, without the base.
pub const HA_PREFIX: &str = "homeassistant/";

/// Topic on the wire for a stored topic.
pub fn full_topic(base: &str, topic: &str) -> String {
    if topic.starts_with(HA_PREFIX) {
        topic.to_string()
    } else {
        format!("{base}/{topic}")
    }
}

#[derive(Debug)]
pub struct MessageQueue {
    messages: VecDeque<QueuedMessage>,
    capacity: usize,
    next_id: u16,
    publish_fails: u32,
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::with_capacity(MAX_MQTT_MESSAGES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_id: 0,
            publish_fails: 0,
        }
    }

    /// Queue a publish. Returns `None` (and queues nothing) for an empty topic.
    pub fn enqueue_publish(
        &mut self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Option<Rc<MqttMessage>> {
        self.push(Operation::Publish, topic, payload, retain)
    }

    /// Queue a subscribe. Returns `None` (and queues nothing) for an empty topic.
    pub fn enqueue_subscribe(&mut self, topic: &str) -> Option<Rc<MqttMessage>> {
        self.push(Operation::Subscribe, topic, "", false)
    }

    fn push(
        &mut self,
        operation: Operation,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Option<Rc<MqttMessage>> {
        if topic.is_empty() {
            return None;
        }

        if self.messages.len() >= self.capacity {
            if let Some(evicted) = self.messages.pop_front() {
                debug!(
                    "Queue full, dropping oldest message #{} ({})",
                    evicted.id, evicted.content.topic
                );
            }
        }

        let content = Rc::new(MqttMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
            retain,
        });
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.messages
            .push_back(QueuedMessage::new(id, operation, Rc::clone(&content)));
        Some(content)
    }

    /// Hand the head entry to the transport.
    ///
    /// Subscribes are fire-and-forget. A publish is retried on later calls when
    /// the transport rejects it, and with `qos > 0` stays at the head until
    /// [`on_ack`](Self::on_ack) or [`on_disconnect`](Self::on_disconnect).
    pub fn process<T: MqttTransport + ?Sized>(&mut self, transport: &mut T, base: &str, qos: u8) {
        let Some(head) = self.messages.front_mut() else {
            return;
        };
        let topic = full_topic(base, &head.content.topic);

        if head.operation == Operation::Subscribe {
            debug!("Subscribing to topic: {}", topic);
            if transport.subscribe(&topic, qos).is_none() {
                debug!("Error subscribing to {}", topic);
            }
            self.messages.pop_front();
            return;
        }

        if head.awaiting_ack() {
            debug!("Waiting for QOS-ACK");
            return;
        }

        let content = Rc::clone(&head.content);
        let packet_id = transport.publish(&topic, qos, content.retain, &content.payload);
        debug!(
            "Publishing topic {} (#{:02}, retain={}, retry={}, size={}, pid={})",
            topic,
            head.id,
            content.retain,
            head.retry_count + 1,
            content.payload.len(),
            packet_id.map_or(0, |p| p.get())
        );

        let Some(packet_id) = packet_id else {
            head.retry_count += 1;
            if head.retry_count >= MQTT_PUBLISH_MAX_RETRY {
                error!(
                    "Failed to publish to {} after {} attempts",
                    topic, head.retry_count
                );
                self.publish_fails += 1;
                self.messages.pop_front();
            } else {
                debug!(
                    "Failed to publish to {}. Trying again, #{}",
                    topic,
                    head.retry_count + 1
                );
            }
            return;
        };

        if qos != 0 {
            // keep it until the broker acks it
            head.packet_id = Some(packet_id);
            debug!("Setting packetID for ACK to {}", packet_id);
            return;
        }

        self.messages.pop_front();
    }

    /// The broker acknowledged a publish.
    ///
    /// Acks are assumed to arrive in submission order, so the head is removed
    /// even if the ids differ; a mismatch is counted as a failure.
    pub fn on_ack(&mut self, packet_id: u16) {
        let Some(head) = self.messages.front() else {
            debug!("No message stored for ACK pid {}", packet_id);
            return;
        };

        let Some(expected) = head.packet_id else {
            // last attempt failed, a retry is pending
            debug!("ACK for failed message pid 0");
            return;
        };

        if expected.get() != packet_id {
            error!("Mismatch, expecting PID {}, got {}", expected, packet_id);
            self.publish_fails += 1;
        }

        debug!("ACK pid {}", packet_id);
        self.messages.pop_front();
    }

    /// The link dropped: a head that was waiting for an ack can never get it.
    pub fn on_disconnect(&mut self) {
        if self.messages.front().is_some_and(QueuedMessage::awaiting_ack) {
            self.messages.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn front(&self) -> Option<&QueuedMessage> {
        self.messages.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedMessage> {
        self.messages.iter()
    }

    /// Publishes dropped after exhausting retries, plus ack mismatches.
    pub fn publish_fails(&self) -> u32 {
        self.publish_fails
    }

    pub fn reset_fails(&mut self) {
        self.publish_fails = 0;
    }
}
