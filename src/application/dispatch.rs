use crate::{
    application::{
        network::transport::interface::TransportInterface, peer::PeerManager,
        persistence::interface::PersistenceInterface,
    },
    domain::{AppState, Envelope},
    utils::time::now_ms,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};

/// Outcome of a best-effort fan-out. The dispatch call itself never fails;
/// callers inspect the report.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DispatchReport {
    pub fn all_delivered(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Resolves recipient ids against the peer table and hands envelopes to the
/// transport client.
pub struct MessageDispatcher<T: TransportInterface, P: PersistenceInterface> {
    adapter: Arc<T>,
    state: Arc<AppState>,
    peer_manager: Arc<PeerManager<P>>,
}

impl<T: TransportInterface, P: PersistenceInterface> MessageDispatcher<T, P> {
    pub fn new(
        adapter: Arc<T>,
        state: Arc<AppState>,
        peer_manager: Arc<PeerManager<P>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            adapter,
            state,
            peer_manager,
        })
    }

    /// Sends `text` to every recipient id in order. Unknown ids are skipped
    /// and a failed send never stops the remaining attempts.
    pub async fn send_to_many(&self, recipients: &[String], text: &str) -> DispatchReport {
        let mut report = DispatchReport::default();

        for recipient in recipients {
            let Some(peer) = self.peer_manager.get(recipient).await else {
                warn!("Unknown peer: {recipient}");
                report.skipped.push(recipient.clone());
                continue;
            };

            let envelope = Envelope::Chat {
                from: self.state.identity.id.clone(),
                text: text.to_string(),
                time: now_ms(),
            };

            let addr = SocketAddr::new(peer.ip, peer.port);
            match self.adapter.send(addr, &envelope).await {
                Ok(_ack) => {
                    info!("📨 Sent to {recipient}: \"{text}\"");
                    report.delivered.push(recipient.clone());
                }
                Err(err) => {
                    warn!("Failed to send to {recipient}: {err}");
                    report.failed.push((recipient.clone(), err.to_string()));
                }
            }
        }

        report
    }

    pub async fn send_to(&self, recipient: &str, text: &str) -> DispatchReport {
        self.send_to_many(&[recipient.to_string()], text).await
    }
}
