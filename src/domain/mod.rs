mod event;
mod identity;
mod peer;
mod state;
mod wire;

pub use event::NodeEvent;
pub use identity::Identity;
pub use peer::{Peer, PeerMap, PeerStatus};
pub use state::AppState;
pub use wire::{Ack, DiscoveryPacket, Envelope};
