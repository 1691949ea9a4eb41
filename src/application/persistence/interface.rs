use crate::domain::PeerMap;
use tokio::io;

/// Durable mirror of the peer table. Every mutation of the in-memory table
/// is written through; reads happen once at startup.
#[async_trait::async_trait]
pub trait PersistenceInterface: Send + Sync + 'static {
    async fn load_peers(&self) -> PersistenceResult<PeerMap>;
    async fn save_peers(&self, peers: &PeerMap) -> PersistenceResult<()>;
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug)]
pub enum PersistenceError {
    Failure(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Failure(s) => f.write_str(s),
        }
    }
}

impl From<PersistenceError> for io::Error {
    fn from(value: PersistenceError) -> Self {
        Self::other(value.to_string())
    }
}
