use crate::{
    application::{
        network::discovery::interface::DiscoveryInterface,
        persistence::interface::{PersistenceInterface, PersistenceResult},
    },
    domain::{AppState, Identity, PeerMap},
};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::io;

pub fn test_state(id: &str, port: u16) -> Arc<AppState> {
    Arc::new(AppState {
        identity: Identity {
            id: id.to_string(),
            name: Some(format!("node-{id}")),
            port,
        },
    })
}

pub fn addr(ip: [u8; 4], port: u16) -> SocketAddr {
    SocketAddr::from((ip, port))
}

/// Persistence stub that keeps nothing but counts write-throughs.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub saves: Arc<Mutex<usize>>,
}

#[async_trait::async_trait]
impl PersistenceInterface for CountingStore {
    async fn load_peers(&self) -> PersistenceResult<PeerMap> {
        Ok(PeerMap::new())
    }

    async fn save_peers(&self, _peers: &PeerMap) -> PersistenceResult<()> {
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

impl CountingStore {
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

/// Discovery socket stub: announcements vanish, nothing is ever received.
pub struct NullSocket;

impl DiscoveryInterface for NullSocket {
    async fn announce(&self, _data: &[u8]) -> io::Result<()> {
        Ok(())
    }

    async fn recv(&self) -> io::Result<(Vec<u8>, SocketAddr)> {
        std::future::pending().await
    }
}

/// Discovery socket stub that records what was broadcast.
pub struct CapturingSocket {
    pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl DiscoveryInterface for CapturingSocket {
    async fn announce(&self, data: &[u8]) -> io::Result<()> {
        self.sent.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn recv(&self) -> io::Result<(Vec<u8>, SocketAddr)> {
        std::future::pending().await
    }
}
