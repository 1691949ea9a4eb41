use crate::{
    application::{
        dispatch::MessageDispatcher,
        network::{
            discovery::{interface::DiscoveryInterface, service::DiscoveryService},
            transport::{interface::TransportInterface, service::TransportService},
        },
        peer::PeerManager,
        persistence::interface::PersistenceInterface,
    },
    config::Config,
    domain::{AppState, NodeEvent, PeerMap},
    infra::{
        network::{tcp::TcpAdapter, udp::UdpBroadcastAdapter},
        persistence::json::JsonPeerStore,
    },
};
use std::sync::Arc;
use tokio::{io, sync::broadcast};

const EVENT_CAPACITY: usize = 64;

/// Wires the discovery and transport services to their adapters and drives
/// them for the life of the process. Callers hold an instance; there is no
/// ambient global state.
pub struct Messenger<D: DiscoveryInterface, T: TransportInterface, P: PersistenceInterface> {
    peer_manager: Arc<PeerManager<P>>,
    discovery: DiscoveryService<D, P>,
    transport: TransportService<T>,
    dispatcher: Arc<MessageDispatcher<T, P>>,
    events_tx: broadcast::Sender<NodeEvent>,
}

impl Messenger<UdpBroadcastAdapter, TcpAdapter, JsonPeerStore> {
    pub async fn new_default(config: Config) -> io::Result<Self> {
        let state = AppState::new(&config);

        let udp_adapter = UdpBroadcastAdapter::new(config.discovery_port).await?;
        let tcp_adapter = TcpAdapter::new(config.identity.port).await?;
        let peer_store = JsonPeerStore::new(&config.peers_path).await?;

        Ok(Self::new(state, udp_adapter, tcp_adapter, peer_store).await)
    }
}

impl<D: DiscoveryInterface, T: TransportInterface, P: PersistenceInterface> Messenger<D, T, P> {
    pub async fn new(
        state: Arc<AppState>,
        discovery_adapter: D,
        transport_adapter: T,
        persistence_adapter: P,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let peer_manager = PeerManager::new(persistence_adapter, events_tx.clone()).await;
        let transport_adapter = Arc::new(transport_adapter);

        let discovery = DiscoveryService::new(discovery_adapter, state.clone(), peer_manager.clone());
        let transport = TransportService::new(transport_adapter.clone(), events_tx.clone());
        let dispatcher = MessageDispatcher::new(transport_adapter, state, peer_manager.clone());

        Self {
            peer_manager,
            discovery,
            transport,
            dispatcher,
            events_tx,
        }
    }

    /// Ordered stream of [`NodeEvent`]s: the single subscription contract
    /// the core guarantees to its collaborators.
    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.events_tx.subscribe()
    }

    pub fn dispatcher(&self) -> Arc<MessageDispatcher<T, P>> {
        self.dispatcher.clone()
    }

    pub async fn peers(&self) -> PeerMap {
        self.peer_manager.snapshot().await
    }

    pub async fn run(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::{
                self,
                unix::{SignalKind, signal},
            };
            let ctrl_c = signal::ctrl_c();
            let mut sigterm = signal(SignalKind::terminate()).expect("bind SIGTERM");
            let mut sighup = signal(SignalKind::hangup()).expect("bind SIGHUP");

            tokio::select! {
                res = self._run() => res?,

                _ = ctrl_c => {
                    tracing::info!("🛑 SIGINT"); self.shutdown();
                }

                _ = sigterm.recv() => {
                    tracing::info!("🛑 SIGTERM"); self.shutdown();
                }

                _ = sighup.recv() => {
                    tracing::info!("🛑 SIGHUP"); self.shutdown();
                }
            }
        }

        #[cfg(not(unix))]
        {
            use tokio::signal;

            let ctrl_c = signal::ctrl_c();

            tokio::select! {
                res = self._run() => res?,

                _ = ctrl_c => {
                    tracing::info!("🛑 SIGINT"); self.shutdown();
                }
            }
        }
        Ok(())
    }

    async fn _run(&self) -> io::Result<()> {
        tokio::try_join!(self.discovery.run(), self.transport.run())?;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.discovery.shutdown();
        tracing::info!("✅ Parley gracefully shutdown");
    }
}
