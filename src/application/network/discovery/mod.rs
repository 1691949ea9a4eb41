pub mod interface;
pub mod service;

pub use interface::DiscoveryInterface;
pub use service::DiscoveryService;
