use serde::{Deserialize, Serialize};

/// UDP discovery payload: one JSON object per datagram, tagged on `type`.
/// Anything that does not decode into this shape is dropped at the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiscoveryPacket {
    Announce {
        id: String,
        #[serde(default)]
        name: Option<String>,
        port: u16,
        timestamp: u64,
    },
}

/// TCP message payload: one JSON object per newline-terminated line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Chat { from: String, text: String, time: u64 },
}

/// The acknowledgment line written back for every decoded message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
