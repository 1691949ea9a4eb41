use crate::domain::{Envelope, PeerMap};
use std::net::IpAddr;

/// Events the core publishes to its collaborators, delivered in emission
/// order through the orchestrator's broadcast channel.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// The peer table changed; carries a full snapshot.
    PeersChanged(PeerMap),
    /// A chat line arrived and was acknowledged.
    MessageReceived { envelope: Envelope, from: IpAddr },
}
