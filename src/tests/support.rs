use std::collections::VecDeque;

use serde_json::{Map, Value};

use crate::command::{CommandFlags, CommandInfo, CommandRegistry, CommandRet};
use crate::device::DeviceType;
use crate::transport::{MqttTransport, PacketId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub qos: u8,
    pub retain: bool,
    pub payload: String,
}

/// Transport that records everything and answers from a script.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub connected: bool,
    pub published: Vec<Published>,
    pub subscribed: Vec<(String, u8)>,
    pub will: Option<Published>,
    pub disconnects: usize,
    /// Answers for upcoming publishes; `None` rejects. When empty, every
    /// publish is accepted with an increasing packet id.
    pub publish_results: VecDeque<Option<u16>>,
    /// Reject every subscribe.
    pub reject_subscribe: bool,
    last_id: u16,
}

impl MockTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn published_topics(&self) -> Vec<&str> {
        self.published.iter().map(|p| p.topic.as_str()).collect()
    }

    pub fn subscribed_topics(&self) -> Vec<&str> {
        self.subscribed.iter().map(|(t, _)| t.as_str()).collect()
    }

    fn next_id(&mut self) -> Option<PacketId> {
        self.last_id = self.last_id.wrapping_add(1).max(1);
        PacketId::new(self.last_id)
    }
}

impl MqttTransport for MockTransport {
    fn connected(&self) -> bool {
        self.connected
    }

    fn subscribe(&mut self, topic: &str, qos: u8) -> Option<PacketId> {
        self.subscribed.push((topic.to_string(), qos));
        if self.reject_subscribe {
            None
        } else {
            self.next_id()
        }
    }

    fn publish(&mut self, topic: &str, qos: u8, retain: bool, payload: &str) -> Option<PacketId> {
        self.published.push(Published {
            topic: topic.to_string(),
            qos,
            retain,
            payload: payload.to_string(),
        });
        match self.publish_results.pop_front() {
            Some(answer) => answer.and_then(PacketId::new),
            None => self.next_id(),
        }
    }

    fn set_will(&mut self, topic: &str, qos: u8, retain: bool, payload: &str) {
        self.will = Some(Published {
            topic: topic.to_string(),
            qos,
            retain,
            payload: payload.to_string(),
        });
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.disconnects += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub device_type: DeviceType,
    pub cmd: String,
    pub value: String,
    pub admin: bool,
    pub id: i8,
    pub query: bool,
}

/// Command registry that knows a fixed command list and records calls.
#[derive(Debug, Default)]
pub struct MockCommands {
    pub known: Vec<CommandInfo>,
    pub calls: Vec<Call>,
    /// Returned for known commands.
    pub result: Option<CommandRet>,
    /// Copied into the output object of query-mode calls.
    pub query_result: Map<String, Value>,
}

impl MockCommands {
    pub fn with(commands: &[(DeviceType, &str, CommandFlags)]) -> Self {
        Self {
            known: commands
                .iter()
                .map(|(device_type, cmd, flags)| CommandInfo {
                    device_type: *device_type,
                    cmd: cmd.to_string(),
                    flags: *flags,
                })
                .collect(),
            ..Self::default()
        }
    }
}

impl CommandRegistry for MockCommands {
    fn call(
        &mut self,
        device_type: DeviceType,
        cmd: &str,
        value: &str,
        admin: bool,
        id: i8,
        output: Option<&mut Map<String, Value>>,
    ) -> CommandRet {
        self.calls.push(Call {
            device_type,
            cmd: cmd.to_string(),
            value: value.to_string(),
            admin,
            id,
            query: output.is_some(),
        });

        let known = self
            .known
            .iter()
            .any(|c| c.device_type == device_type && c.cmd == cmd);
        if !known {
            return CommandRet::NotFound;
        }
        if let Some(out) = output {
            out.extend(self.query_result.clone());
        }
        self.result.unwrap_or(CommandRet::Ok)
    }

    fn commands(&self) -> Vec<CommandInfo> {
        self.known.clone()
    }
}
