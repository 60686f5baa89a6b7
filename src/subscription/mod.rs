//! The subscription registry.
//!
//! Maps a topic below the base to the device it belongs to and to what should
//! happen with inbound messages on it: either a bespoke callback, or the
//! command convention where the topic tail or JSON body names the command.

use std::fmt;

use crate::device::DeviceType;

/// Callback for a bespoke topic. Returns `false` when the payload is invalid.
pub type Callback = Box<dyn FnMut(&str) -> bool>;

pub enum Handler {
    Explicit(Callback),
    /// The topic carries commands for its device by naming convention.
    CommandConvention,
}

impl Handler {
    pub fn explicit(callback: impl FnMut(&str) -> bool + 'static) -> Self {
        Handler::Explicit(Box::new(callback))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Explicit(_) => f.write_str("Explicit(..)"),
            Handler::CommandConvention => f.write_str("CommandConvention"),
        }
    }
}

#[derive(Debug)]
pub struct SubscriptionEntry {
    pub device_type: DeviceType,
    /// Topic without the base prefix.
    pub topic: String,
    pub handler: Handler,
}

/// Registered topics, unique per `(device_type, topic)`.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: Vec<SubscriptionEntry>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the topic, or updates the callback of an existing entry.
    ///
    /// Re-registering with [`Handler::CommandConvention`] leaves an existing
    /// callback in place. Returns `true` when a new entry was added.
    pub fn register(&mut self, device_type: DeviceType, topic: &str, handler: Handler) -> bool {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.device_type == device_type && e.topic == topic)
        {
            if let Handler::Explicit(_) = handler {
                entry.handler = handler;
            }
            return false;
        }

        self.entries.push(SubscriptionEntry {
            device_type,
            topic: topic.to_string(),
            handler,
        });
        true
    }

    pub fn contains(&self, device_type: DeviceType, topic: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.device_type == device_type && e.topic == topic)
    }

    /// First entry registered for `topic`, whatever its device type.
    pub fn find_mut(&mut self, topic: &str) -> Option<&mut SubscriptionEntry> {
        self.entries.iter_mut().find(|e| e.topic == topic)
    }

    pub fn topics_for(&self, device_type: DeviceType) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.device_type == device_type)
            .map(|e| e.topic.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests;
