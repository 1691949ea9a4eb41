pub mod interface;
pub mod service;

pub use interface::TransportInterface;
pub use service::TransportService;
