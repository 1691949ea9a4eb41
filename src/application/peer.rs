use crate::{
    application::persistence::interface::PersistenceInterface,
    domain::{NodeEvent, Peer, PeerMap, PeerStatus},
};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{error, info};

/// Owns the peer table. Mutations come only from the discovery service's
/// packet and sweep handlers; everyone else reads snapshots.
pub struct PeerManager<P: PersistenceInterface> {
    peers: RwLock<PeerMap>,
    db: P,
    events_tx: broadcast::Sender<NodeEvent>,
}

impl<P: PersistenceInterface> PeerManager<P> {
    /// Loads the persisted table; an unreadable table starts empty and the
    /// node keeps running on in-memory state.
    pub async fn new(db: P, events_tx: broadcast::Sender<NodeEvent>) -> Arc<Self> {
        let peers = match db.load_peers().await {
            Ok(peers) => peers,
            Err(err) => {
                error!("Failed to load persisted peers: {err}");
                PeerMap::new()
            }
        };

        Arc::new(Self {
            peers: RwLock::new(peers),
            db,
            events_tx,
        })
    }

    /// Records an announcement. The table is persisted on every call; a
    /// `PeersChanged` event fires only when `ip`, `port`, `name`, or a
    /// previously `offline` status actually changed.
    pub async fn record_announce(&self, peer: Peer) -> bool {
        let (snapshot, changed) = {
            let mut peers = self.peers.write().await;

            let changed = match peers.get(&peer.id) {
                None => true,
                Some(prev) => {
                    prev.ip != peer.ip
                        || prev.port != peer.port
                        || prev.name != peer.name
                        || prev.status == PeerStatus::Offline
                }
            };

            if changed {
                info!("🟢 Peer updated: {} ({}:{})", peer.name, peer.ip, peer.port);
            }
            peers.insert(peer.id.clone(), peer);

            (peers.clone(), changed)
        };

        self.persist(&snapshot).await;

        if changed {
            let _ = self.events_tx.send(NodeEvent::PeersChanged(snapshot));
        }
        changed
    }

    /// Flips every online peer silent for longer than `timeout_ms` to
    /// offline. Persists and notifies at most once per sweep, no matter how
    /// many records flipped.
    pub async fn sweep_offline(&self, now: u64, timeout_ms: u64) -> bool {
        let snapshot = {
            let mut peers = self.peers.write().await;
            let mut changed = false;

            for peer in peers.values_mut() {
                if peer.status == PeerStatus::Online
                    && now.saturating_sub(peer.last_seen) > timeout_ms
                {
                    peer.status = PeerStatus::Offline;
                    changed = true;
                    info!("🔴 Peer offline: {}", peer.name);
                }
            }

            changed.then(|| peers.clone())
        };

        match snapshot {
            Some(snapshot) => {
                self.persist(&snapshot).await;
                let _ = self.events_tx.send(NodeEvent::PeersChanged(snapshot));
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, id: &str) -> Option<Peer> {
        self.peers.read().await.get(id).cloned()
    }

    pub async fn snapshot(&self) -> PeerMap {
        self.peers.read().await.clone()
    }

    async fn persist(&self, peers: &PeerMap) {
        if let Err(err) = self.db.save_peers(peers).await {
            error!("Failed to persist peer table: {err}");
        }
    }
}
