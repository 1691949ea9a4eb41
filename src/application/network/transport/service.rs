use crate::{application::network::transport::interface::TransportInterface, domain::NodeEvent};
use std::sync::Arc;
use tokio::{io, sync::broadcast};
use tracing::{info, warn};

/// Forwards every acknowledged inbound line to the event bus, in arrival
/// order.
pub struct TransportService<T: TransportInterface> {
    adapter: Arc<T>,
    events_tx: broadcast::Sender<NodeEvent>,
}

impl<T: TransportInterface> TransportService<T> {
    pub fn new(adapter: Arc<T>, events_tx: broadcast::Sender<NodeEvent>) -> Self {
        Self { adapter, events_tx }
    }

    pub async fn run(&self) -> io::Result<()> {
        while let Some(inbound) = self.adapter.next().await? {
            info!(from = %inbound.src_ip, "💬 Message received");

            let _ = self.events_tx.send(NodeEvent::MessageReceived {
                envelope: inbound.envelope,
                from: inbound.src_ip,
            });
        }
        warn!("Transport adapter channel closed");
        Ok(())
    }
}
