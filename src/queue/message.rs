use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::transport::PacketId;

/// What the queue entry asks the transport to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Publish,
    Subscribe,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Publish => f.write_str("Pub"),
            Operation::Subscribe => f.write_str("Sub"),
        }
    }
}

/// Immutable content of a queued message.
///
/// `topic` is stored without the base prefix, except for Home Assistant
/// discovery topics which are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
    pub retain: bool,
}

/// One entry of the outbound queue.
///
/// Only the head entry is ever mutated, and only the head may carry a
/// `packet_id`.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
    /// Wrapping sequence number, for display only.
    pub id: u16,
    pub operation: Operation,
    pub content: Rc<MqttMessage>,
    /// Set once the publish was handed to the transport and an ack is expected.
    pub packet_id: Option<PacketId>,
    pub retry_count: u8,
}

impl QueuedMessage {
    pub fn new(id: u16, operation: Operation, content: Rc<MqttMessage>) -> Self {
        Self {
            id,
            operation,
            content,
            packet_id: None,
            retry_count: 0,
        }
    }

    pub fn awaiting_ack(&self) -> bool {
        self.packet_id.is_some()
    }
}
