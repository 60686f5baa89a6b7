use std::fmt;

use crate::command::CommandRegistry;
use crate::config::MqttSettings;
use crate::queue::MQTT_PUBLISH_WAIT;
use crate::transport::MqttTransport;

use super::Mqtt;

/// Groups of device values that share a publish interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishCategory {
    Boiler,
    Thermostat,
    Solar,
    Mixer,
    Other,
    Sensor,
}

impl PublishCategory {
    /// Polling order. At most one category is published per loop.
    pub const ALL: [PublishCategory; 6] = [
        PublishCategory::Boiler,
        PublishCategory::Thermostat,
        PublishCategory::Solar,
        PublishCategory::Mixer,
        PublishCategory::Other,
        PublishCategory::Sensor,
    ];

    /// Interval in milliseconds; 0 means publish on change.
    pub fn interval_ms(self, settings: &MqttSettings) -> u64 {
        let secs = match self {
            PublishCategory::Boiler => settings.publish_time_boiler,
            PublishCategory::Thermostat => settings.publish_time_thermostat,
            PublishCategory::Solar => settings.publish_time_solar,
            PublishCategory::Mixer => settings.publish_time_mixer,
            PublishCategory::Other => settings.publish_time_other,
            PublishCategory::Sensor => settings.publish_time_sensor,
        };
        u64::from(secs) * 1000
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PublishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishCategory::Boiler => "boiler",
            PublishCategory::Thermostat => "thermostat",
            PublishCategory::Solar => "solar",
            PublishCategory::Mixer => "mixer",
            PublishCategory::Other => "other",
            PublishCategory::Sensor => "sensor",
        };
        f.write_str(name)
    }
}

/// Last publish time per category.
#[derive(Debug, Default, Clone)]
pub struct PublishSchedule {
    last_publish: [u64; PublishCategory::ALL.len()],
}

impl PublishSchedule {
    /// First category whose interval elapsed at `now_ms`, marked as published.
    ///
    /// The last publish time is aligned down to a multiple of the interval so
    /// that slow loops do not make the schedule drift.
    pub fn next_due(&mut self, now_ms: u64, settings: &MqttSettings) -> Option<PublishCategory> {
        for category in PublishCategory::ALL {
            let interval = category.interval_ms(settings);
            if interval == 0 {
                continue;
            }
            let last = &mut self.last_publish[category.index()];
            if now_ms.saturating_sub(*last) > interval {
                *last = (now_ms / interval) * interval;
                return Some(category);
            }
        }
        None
    }
}

impl<T: MqttTransport, C: CommandRegistry> Mqtt<T, C> {
    /// One pass of the main loop at `now_ms` (milliseconds since start).
    pub fn loop_once(&mut self, now_ms: u64) {
        if !self.settings.enabled || !self.connected() {
            return;
        }

        let poll_due = self
            .last_poll
            .is_none_or(|last| now_ms.saturating_sub(last) > MQTT_PUBLISH_WAIT);
        if poll_due {
            self.last_poll = Some(now_ms);
            self.process_queue();
        }

        if self.settings.publish_time_sensor == 0 {
            self.run_producers(|p, out| p.publish_values(PublishCategory::Sensor, false, out));
        }

        // values only go out once the queue has drained
        if !self.queue.is_empty() {
            return;
        }

        if let Some(category) = self.schedule.next_due(now_ms, &self.settings) {
            self.run_producers(|p, out| p.publish_values(category, true, out));
        }
    }
}
