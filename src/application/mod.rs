pub mod dispatch;
pub mod messenger;
pub mod network;
pub mod peer;
pub mod persistence;

pub use dispatch::MessageDispatcher;
pub use messenger::Messenger;
pub use peer::PeerManager;
