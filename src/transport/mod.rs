//! The `transport` module is the seam between the MQTT core and the wire client.
//!
//! The core never speaks the MQTT protocol itself. It submits subscribe and
//! publish requests through [`MqttTransport`], which answers synchronously with
//! an in-flight packet id or a rejection, and it is fed back through
//! [`MqttEvent`]s for connects, disconnects, acks and inbound messages.

pub mod log;
pub mod message;

use std::num::NonZeroU16;

pub use log::LogTransport;
pub use message::{DisconnectReason, MqttEvent};

/// Token handed back by the wire client for a submitted packet.
pub type PacketId = NonZeroU16;

/// Client capability consumed by the core.
///
/// `subscribe` and `publish` return `None` when the client refused the packet
/// outright (not connected, buffer full, ...).
pub trait MqttTransport {
    fn connected(&self) -> bool;

    fn subscribe(&mut self, topic: &str, qos: u8) -> Option<PacketId>;

    fn publish(&mut self, topic: &str, qos: u8, retain: bool, payload: &str) -> Option<PacketId>;

    /// Register the message the broker publishes when the link is lost uncleanly.
    fn set_will(&mut self, topic: &str, qos: u8, retain: bool, payload: &str);

    /// Drop the connection; the client reconnects on its own.
    fn disconnect(&mut self);
}
