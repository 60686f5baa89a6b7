//! Runs the MQTT core against a logging transport.
//!
//! Settings come from `config/default.toml`, `EMSMQTT__*` environment
//! variables and an optional `.env` file. Publishes are printed instead of
//! being sent, which is handy to watch the queue and discovery output.

use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use emsmqtt::command::{CommandFlags, CommandInfo, CommandRegistry, CommandRet};
use emsmqtt::config::{ConfigFile, load_config};
use emsmqtt::device::DeviceType;
use emsmqtt::mqtt::{Mqtt, SystemInfo};
use emsmqtt::subscription::Handler;
use emsmqtt::transport::LogTransport;
use emsmqtt::utils::error::Result;

const LOOP_PERIOD: Duration = Duration::from_millis(50);

/// Accepts the system commands and logs every call.
struct LogCommands {
    known: Vec<CommandInfo>,
}

impl LogCommands {
    fn new() -> Self {
        let known = ["send", "pin", "publish"]
            .into_iter()
            .map(|cmd| CommandInfo {
                device_type: DeviceType::System,
                cmd: cmd.to_string(),
                flags: CommandFlags::NORMAL,
            })
            .collect();
        Self { known }
    }
}

impl CommandRegistry for LogCommands {
    fn call(
        &mut self,
        device_type: DeviceType,
        cmd: &str,
        value: &str,
        _admin: bool,
        id: i8,
        _output: Option<&mut Map<String, Value>>,
    ) -> CommandRet {
        info!("Command {}/{} value={} id={}", device_type, cmd, value, id);
        if self
            .known
            .iter()
            .any(|c| c.device_type == device_type && c.cmd == cmd)
        {
            CommandRet::Ok
        } else {
            CommandRet::NotFound
        }
    }

    fn commands(&self) -> Vec<CommandInfo> {
        self.known.clone()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        emsmqtt::utils::logging::init("info");
        error!("emsmqtt failed: {}", e);
    }
}

async fn run() -> Result<()> {
    let settings = load_config()?;
    emsmqtt::utils::logging::init(&settings.logging.level);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let commands = LogCommands::new();
    let known = commands.commands();

    let mut mqtt = Mqtt::new(LogTransport::new(tx), commands, ConfigFile::default());
    mqtt.set_system_info(SystemInfo::default());
    mqtt.start();

    for info in &known {
        mqtt.register_command(info.device_type, &info.cmd, info.flags);
    }
    mqtt.subscribe_generic(
        "restart",
        Handler::explicit(|payload| {
            info!("Restart requested ({})", payload);
            true
        }),
    );

    mqtt.transport_mut().connect();

    let started = Instant::now();
    let mut ticker = tokio::time::interval(LOOP_PERIOD);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                mqtt.loop_once(now);
            }
            Some(event) = rx.recv() => mqtt.handle_event(event),
            _ = &mut shutdown => {
                info!("Shutdown signal received. Exiting gracefully.");
                break;
            }
        }
    }

    let status = mqtt.status();
    info!("{}", status);
    debug!("Status document: {}", serde_json::to_string(&status)?);

    mqtt.reset_mqtt();
    while let Ok(event) = rx.try_recv() {
        mqtt.handle_event(event);
    }
    Ok(())
}
