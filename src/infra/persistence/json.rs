use crate::{
    application::persistence::interface::{
        PersistenceError, PersistenceInterface, PersistenceResult,
    },
    domain::PeerMap,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Peer table mirrored to a pretty-printed JSON file, rewritten in full on
/// every save. External readers may catch a partial write; like this node,
/// they must treat a parse failure as an empty table.
pub struct JsonPeerStore {
    path: PathBuf,
}

impl JsonPeerStore {
    /// Opens the store, creating an empty table file when none exists.
    pub async fn new(path: &Path) -> tokio::io::Result<Self> {
        if !path.exists() {
            fs::write(path, "{}").await?;
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait::async_trait]
impl PersistenceInterface for JsonPeerStore {
    async fn load_peers(&self) -> PersistenceResult<PeerMap> {
        let contents = fs::read_to_string(&self.path)
            .await
            .map_err(|e| PersistenceError::Failure(e.to_string()))?;

        match serde_json::from_str(&contents) {
            Ok(peers) => Ok(peers),
            Err(err) => {
                warn!("Unreadable peer table, starting empty: {err}");
                Ok(PeerMap::new())
            }
        }
    }

    async fn save_peers(&self, peers: &PeerMap) -> PersistenceResult<()> {
        let contents = serde_json::to_string_pretty(peers)
            .map_err(|e| PersistenceError::Failure(e.to_string()))?;

        fs::write(&self.path, contents)
            .await
            .map_err(|e| PersistenceError::Failure(e.to_string()))
    }
}
