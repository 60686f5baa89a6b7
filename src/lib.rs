//! # emsmqtt
//!
//! `emsmqtt` is the MQTT reliability and routing core of a heating bus bridge.
//! It queues outgoing publishes and subscribes with bounded retries and QoS
//! acknowledgement tracking, routes inbound messages to device commands, and
//! announces device values to Home Assistant through MQTT discovery.
//!
//! ## Core Modules
//!
//! - `mqtt`: The context object tying everything together, driven by a periodic loop and transport events.
//! - `queue`: The bounded outbound queue and its delivery state machine.
//! - `subscription`: Registered topics and how their messages are handled.
//! - `command`: The seam to the device command registry.
//! - `ha`: Home Assistant discovery documents.
//! - `device`: Device types, value tags, units and value types.
//! - `transport`: The seam to the wire client and its event enumeration.
//! - `config`: Loading MQTT settings from file and environment.
//! - `utils`: Shared error type and logging setup.

pub mod command;
pub mod config;
pub mod device;
pub mod ha;
pub mod mqtt;
pub mod queue;
pub mod subscription;
pub mod transport;
pub mod utils;

#[cfg(test)]
pub(crate) mod tests;
