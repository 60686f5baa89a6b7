use std::fmt;

/// Notifications from the wire client, consumed by `Mqtt::handle_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MqttEvent {
    Connected,
    Disconnected(DisconnectReason),
    /// A publish arrived on one of our subscriptions.
    Message { topic: String, payload: Vec<u8> },
    /// The broker acknowledged the publish with this packet id.
    PublishAck(u16),
}

/// Why the wire client lost or refused the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    TcpDisconnected,
    UnacceptableProtocolVersion,
    IdentifierRejected,
    ServerUnavailable,
    MalformedCredentials,
    NotAuthorized,
    NotEnoughSpace,
    TlsBadFingerprint,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DisconnectReason::TcpDisconnected => "TCP",
            DisconnectReason::UnacceptableProtocolVersion => "Unacceptable protocol version",
            DisconnectReason::IdentifierRejected => "Identifier Rejected",
            DisconnectReason::ServerUnavailable => "Server unavailable",
            DisconnectReason::MalformedCredentials => "Malformed credentials",
            DisconnectReason::NotAuthorized => "Not authorized",
            DisconnectReason::NotEnoughSpace => "Not enough space",
            DisconnectReason::TlsBadFingerprint => "TLS bad fingerprint",
        };
        f.write_str(text)
    }
}
