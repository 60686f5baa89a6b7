use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::command::{CommandRegistry, CommandRet, NO_ID};
use crate::device::DeviceType;
use crate::subscription::Handler;
use crate::transport::MqttTransport;

use super::{Mqtt, PublishOutbox, RESPONSE_TOPIC};

/// Why an inbound message was dropped.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("received empty message on {0}")]
    EmptyPayload(String),
    #[error("received message for foreign topic {0}")]
    ForeignTopic(String),
    #[error("no MQTT handler found for topic {topic} and payload {payload}")]
    NoHandler { topic: String, payload: String },
    #[error("no command given in topic {0}")]
    MissingCommandSegment(String),
    #[error("failed to deserialize json {payload}: {source}")]
    Json {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid payload cmd format, message={0}")]
    MissingCmd(String),
    #[error("unsupported data type for cmd {0}")]
    UnsupportedData(String),
}

/// JSON body of a command message.
#[derive(Debug, Deserialize)]
struct CommandPayload {
    cmd: Option<String>,
    hc: Option<i64>,
    id: Option<i64>,
    #[serde(default)]
    data: Value,
}

/// What `data` asks the command to do.
#[derive(Debug, PartialEq)]
enum CommandData {
    Set(String),
    Query,
}

impl CommandPayload {
    /// Sub-unit selector: `hc` wins over `id`.
    fn sub_unit(&self) -> i8 {
        self.hc
            .or(self.id)
            .and_then(|n| i8::try_from(n).ok())
            .unwrap_or(NO_ID)
    }

    fn command_data(&self) -> Option<CommandData> {
        match &self.data {
            Value::Null => Some(CommandData::Query),
            Value::String(s) => Some(CommandData::Set(s.clone())),
            Value::Number(n) => {
                let rendered = if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    format!("{:.2}", n.as_f64().unwrap_or_default())
                };
                Some(CommandData::Set(rendered))
            }
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl<T: MqttTransport, C: CommandRegistry> Mqtt<T, C> {
    /// Route one inbound message. Problems are logged, never returned.
    pub fn on_message(&mut self, full_topic: &str, payload: &[u8]) {
        match self.dispatch(full_topic, payload) {
            Ok(()) => {}
            Err(e @ (DispatchError::EmptyPayload(_) | DispatchError::ForeignTopic(_))) => {
                debug!("{}", e);
            }
            Err(e) => error!("MQTT error: {}", e),
        }
    }

    /// Feed a message as if it came from the broker.
    pub fn incoming(&mut self, full_topic: &str, payload: &str) {
        self.on_message(full_topic, payload.as_bytes());
    }

    fn dispatch(&mut self, full_topic: &str, payload: &[u8]) -> Result<(), DispatchError> {
        if payload.is_empty() {
            return Err(DispatchError::EmptyPayload(full_topic.to_string()));
        }

        let path = full_topic
            .strip_prefix(self.settings.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| DispatchError::ForeignTopic(full_topic.to_string()))?;

        let message = String::from_utf8_lossy(payload);
        let message: &str = &message;
        let (topic, rest) = match path.split_once('/') {
            Some((topic, rest)) => (topic, Some(rest)),
            None => (path, None),
        };
        debug!("Received {} => {} (length {})", topic, message, payload.len());

        let entry = self
            .subscriptions
            .find_mut(topic)
            .ok_or_else(|| DispatchError::NoHandler {
                topic: topic.to_string(),
                payload: message.to_string(),
            })?;
        let device_type = entry.device_type;

        if let Handler::Explicit(callback) = &mut entry.handler {
            if !callback(message) {
                error!("MQTT error: invalid payload {} for this topic {}", message, topic);
                self.publish(RESPONSE_TOPIC, "invalid");
            }
            return Ok(());
        }

        if !message.starts_with('{') {
            let cmd = rest
                .filter(|cmd| !cmd.is_empty())
                .ok_or_else(|| DispatchError::MissingCommandSegment(path.to_string()))?;
            let ret = self.commands.call(device_type, cmd, message, true, NO_ID, None);
            self.respond(ret, cmd, path);
            return Ok(());
        }

        self.dispatch_json(device_type, message, path)
    }

    fn dispatch_json(
        &mut self,
        device_type: DeviceType,
        message: &str,
        path: &str,
    ) -> Result<(), DispatchError> {
        let request: CommandPayload =
            serde_json::from_str(message).map_err(|source| DispatchError::Json {
                payload: message.to_string(),
                source,
            })?;
        let Some(cmd) = request.cmd.as_deref() else {
            return Err(DispatchError::MissingCmd(message.to_string()));
        };
        let id = request.sub_unit();

        let ret = match request.command_data() {
            Some(CommandData::Set(value)) => {
                self.commands.call(device_type, cmd, &value, true, id, None)
            }
            Some(CommandData::Query) => {
                let mut output = Map::new();
                let ret = self
                    .commands
                    .call(device_type, cmd, "", true, id, Some(&mut output));
                if !output.is_empty() {
                    self.publish_json(RESPONSE_TOPIC, &Value::Object(output));
                    return Ok(());
                }
                ret
            }
            None => return Err(DispatchError::UnsupportedData(cmd.to_string())),
        };

        self.respond(ret, cmd, path);
        Ok(())
    }

    fn respond(&mut self, ret: CommandRet, cmd: &str, path: &str) {
        match ret {
            CommandRet::Ok => {}
            CommandRet::NotFound => {
                error!("MQTT error: no matching cmd ({}) in topic {}", cmd, path);
                self.publish(RESPONSE_TOPIC, "unknown");
            }
            CommandRet::Error => {
                error!("MQTT error: invalid data with cmd ({}) in topic {}", cmd, path);
                self.publish(RESPONSE_TOPIC, "unknown");
            }
        }
    }
}
