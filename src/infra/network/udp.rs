use crate::application::network::discovery::interface::DiscoveryInterface;
use local_ip_address::list_afinet_netifas;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::{io, net::UdpSocket};
use tracing::info;

pub struct UdpBroadcastAdapter {
    socket: UdpSocket,
    broadcast_addr: SocketAddr,
}

impl UdpBroadcastAdapter {
    /// Binds the discovery port for both send and receive. Reuse-address is
    /// set so several nodes on one host can share the port.
    pub async fn new(port: u16) -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;

        let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
        socket.bind(&bind_addr.into())?;

        let std_socket: std::net::UdpSocket = socket.into();
        std_socket.set_nonblocking(true)?;

        let socket = UdpSocket::from_std(std_socket)?;
        socket.set_broadcast(true)?;

        let broadcast_addr = SocketAddr::new(IpAddr::V4(resolve_broadcast_addr()), port);

        info!("Discovery listening on UDP {port}");
        info!("Broadcasting to {broadcast_addr}");

        Ok(Self {
            socket,
            broadcast_addr,
        })
    }
}

impl DiscoveryInterface for UdpBroadcastAdapter {
    async fn announce(&self, data: &[u8]) -> io::Result<()> {
        self.socket
            .send_to(data, self.broadcast_addr)
            .await
            .map(|_| ())
    }

    async fn recv(&self) -> io::Result<(Vec<u8>, SocketAddr)> {
        let mut buf = vec![0u8; 1500];
        let (size, src_addr) = self.socket.recv_from(&mut buf).await?;
        buf.truncate(size);

        Ok((buf, src_addr))
    }
}

/// First non-loopback IPv4 interface with its final octet set to 255.
/// Assumes a /24-equivalent LAN; the real subnet mask is not consulted.
/// Falls back to the all-networks broadcast address.
pub fn resolve_broadcast_addr() -> Ipv4Addr {
    let Ok(ifas) = list_afinet_netifas() else {
        return Ipv4Addr::BROADCAST;
    };

    for (_, addr) in ifas {
        if let IpAddr::V4(v4) = addr
            && !v4.is_loopback()
        {
            let [a, b, c, _] = v4.octets();
            return Ipv4Addr::new(a, b, c, 255);
        }
    }

    Ipv4Addr::BROADCAST
}
