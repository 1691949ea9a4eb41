use crate::domain::Envelope;
use std::net::{IpAddr, SocketAddr};
use tokio::io;

/// Inbound side: `next()` yields one decoded, acknowledged line at a time.
/// Outbound side: `send()` opens a fresh connection per call and resolves
/// with the peer's first response line.
pub trait TransportInterface {
    async fn next(&self) -> io::Result<Option<InboundMessage>>;
    async fn send(
        &self,
        addr: SocketAddr,
        envelope: &Envelope,
    ) -> TransportResult<serde_json::Value>;
}

pub struct InboundMessage {
    pub envelope: Envelope,
    pub src_ip: IpAddr,
}

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug)]
pub enum TransportError {
    /// No connect or response within the send deadline.
    Timeout,
    /// The connection went down before an acknowledgment line arrived.
    ConnectionClosed,
    /// The first response line was not valid JSON.
    BadAck(String),
    /// Underlying socket failure (refused, reset, ...).
    Io(io::Error),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Timeout => f.write_str("TCP connection timeout"),
            TransportError::ConnectionClosed => f.write_str("Unable to connect to peer"),
            TransportError::BadAck(line) => write!(f, "invalid acknowledgment line: {line}"),
            TransportError::Io(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(io::Error::other(err))
    }
}

impl From<TransportError> for io::Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Io(err) => err,
            other => io::Error::other(other.to_string()),
        }
    }
}
