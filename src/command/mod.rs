//! The command registry seam.
//!
//! Devices own their commands; the MQTT core only knows them by name. Inbound
//! messages are turned into [`CommandRegistry::call`]s, and the enumerated
//! commands decide which per-command topics get subscribed.

use std::ops::BitOr;

use serde_json::{Map, Value};

use crate::config::SubscribeFormat;
use crate::device::DeviceType;

/// Sub-unit value meaning "no heating circuit / id given".
pub const NO_ID: i8 = -1;

/// Result of invoking a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRet {
    Ok,
    NotFound,
    Error,
}

/// Per-command subscription hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandFlags(u8);

impl CommandFlags {
    pub const NORMAL: CommandFlags = CommandFlags(0);
    /// The command exists once per heating circuit.
    pub const HC: CommandFlags = CommandFlags(1);
    /// The command exists once per warm water circuit.
    pub const WW: CommandFlags = CommandFlags(2);
    /// Never subscribe an individual topic for this command.
    pub const NOSUB: CommandFlags = CommandFlags(4);

    pub fn contains(self, other: CommandFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CommandFlags {
    type Output = CommandFlags;

    fn bitor(self, rhs: CommandFlags) -> CommandFlags {
        CommandFlags(self.0 | rhs.0)
    }
}

/// A command as enumerated by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub device_type: DeviceType,
    pub cmd: String,
    pub flags: CommandFlags,
}

/// The external owner of device commands.
pub trait CommandRegistry {
    /// Invoke `cmd` on `device_type` with an already rendered `value`.
    ///
    /// `id` selects a sub-unit such as a heating circuit, [`NO_ID`] when absent.
    /// When `output` is given the command runs in query mode and fills it
    /// instead of changing anything.
    fn call(
        &mut self,
        device_type: DeviceType,
        cmd: &str,
        value: &str,
        admin: bool,
        id: i8,
        output: Option<&mut Map<String, Value>>,
    ) -> CommandRet;

    fn commands(&self) -> Vec<CommandInfo>;
}

/// Extra topics (below the base) a command is reachable on, besides
/// `<device>` itself.
pub fn command_topics(
    format: SubscribeFormat,
    device_type: DeviceType,
    cmd: &str,
    flags: CommandFlags,
) -> Vec<String> {
    let device = device_type.name();
    match format {
        SubscribeFormat::IndividualAllHc if flags.contains(CommandFlags::HC) => (1..=4)
            .map(|hc| format!("{device}/hc{hc}/{cmd}"))
            .collect(),
        SubscribeFormat::Individual | SubscribeFormat::IndividualAllHc
            if !flags.contains(CommandFlags::NOSUB) =>
        {
            vec![format!("{device}/{cmd}")]
        }
        _ => Vec::new(),
    }
}
