use std::net::SocketAddr;
use tokio::io;

/// Datagram port the discovery service uses to reach the broadcast domain.
/// The adapter owns the socket and the broadcast destination.
pub trait DiscoveryInterface {
    async fn announce(&self, data: &[u8]) -> io::Result<()>;
    async fn recv(&self) -> io::Result<(Vec<u8>, SocketAddr)>;
}
