use crate::{
    application::{
        network::discovery::interface::DiscoveryInterface, peer::PeerManager,
        persistence::interface::PersistenceInterface,
    },
    domain::{AppState, DiscoveryPacket, Peer},
    utils::time::now_ms,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{io, sync::Notify, time};
use tracing::{debug, info, warn};

const ANNOUNCE_INTERVAL: Duration = Duration::from_millis(3000);
const SWEEP_INTERVAL: Duration = Duration::from_millis(3000);

// Must exceed two announce intervals so one dropped broadcast cannot flap a
// peer to offline; 10 s gives a 3x margin on congested LANs.
const OFFLINE_TIMEOUT_MS: u64 = 10_000;

pub struct DiscoveryService<D: DiscoveryInterface, P: PersistenceInterface> {
    adapter: D,
    state: Arc<AppState>,
    peer_manager: Arc<PeerManager<P>>,
    shutdown: Notify,
}

impl<D: DiscoveryInterface, P: PersistenceInterface> DiscoveryService<D, P> {
    pub fn new(adapter: D, state: Arc<AppState>, peer_manager: Arc<PeerManager<P>>) -> Self {
        Self {
            adapter,
            state,
            peer_manager,
            shutdown: Notify::new(),
        }
    }

    /// Runs the announce, receive, and sweep loops until a socket error or
    /// [`shutdown`](Self::shutdown). Each loop awaits its own previous
    /// iteration, so a given timer never overlaps itself.
    pub async fn run(&self) -> io::Result<()> {
        tokio::select! {
            res = async { tokio::try_join!(self.run_announce(), self.run_recv(), self.run_sweep()) } => {
                res.map(|_| ())
            }

            _ = self.shutdown.notified() => {
                info!("Discovery stopped");
                Ok(())
            }
        }
    }

    /// Stops the run future, cancelling both timers and releasing the
    /// socket. Idempotent; safe to call before or after `run`.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    async fn run_announce(&self) -> io::Result<()> {
        let mut ticker = time::interval(ANNOUNCE_INTERVAL);

        // The first tick completes immediately: one announcement goes out
        // as soon as the service starts.
        loop {
            ticker.tick().await;
            self.announce().await;
        }
    }

    async fn announce(&self) {
        let packet = DiscoveryPacket::Announce {
            id: self.state.identity.id.clone(),
            name: self.state.identity.name.clone(),
            port: self.state.identity.port,
            timestamp: now_ms(),
        };

        let payload = match serde_json::to_vec(&packet) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Failed to serialize announcement: {err}");
                return;
            }
        };

        // Send failures are logged only; the next tick announces again.
        if let Err(err) = self.adapter.announce(&payload).await {
            warn!("Announce error: {err}");
        }
    }

    async fn run_recv(&self) -> io::Result<()> {
        loop {
            let (buf, src_addr) = self.adapter.recv().await?;
            self.handle_packet(&buf, src_addr).await;
        }
    }

    /// Fails open: anything that is not a well-formed announcement from
    /// another node is dropped without an error.
    pub(crate) async fn handle_packet(&self, buf: &[u8], src_addr: SocketAddr) {
        let packet = match serde_json::from_slice::<DiscoveryPacket>(buf) {
            Ok(packet) => packet,
            Err(err) => {
                debug!(src = %src_addr, "Dropping invalid discovery packet: {err}");
                return;
            }
        };

        let DiscoveryPacket::Announce { id, name, port, .. } = packet;

        if id == self.state.identity.id {
            return; // self echo
        }

        let peer = Peer::from_announce(id, name, src_addr.ip(), port, now_ms());
        self.peer_manager.record_announce(peer).await;
    }

    async fn run_sweep(&self) -> io::Result<()> {
        let mut ticker = time::interval(SWEEP_INTERVAL);

        loop {
            ticker.tick().await;
            self.peer_manager
                .sweep_offline(now_ms(), OFFLINE_TIMEOUT_MS)
                .await;
        }
    }
}
