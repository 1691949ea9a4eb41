use serde::{Deserialize, Serialize};
use std::{collections::HashMap, net::IpAddr};

pub type PeerMap = HashMap<String, Peer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerStatus {
    Online,
    Offline,
}

/// One row of the peer table, also the on-disk record shape. Records are
/// never deleted; a silent peer keeps its row with `status: offline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub id: String,
    pub name: String,
    pub ip: IpAddr,
    pub port: u16,
    #[serde(rename = "lastSeen")]
    pub last_seen: u64,
    pub status: PeerStatus,
}

impl Peer {
    /// Builds the candidate record for a received announcement. The sender
    /// address wins over anything claimed in the packet; a missing name
    /// falls back to a short id-derived label.
    pub fn from_announce(id: String, name: Option<String>, ip: IpAddr, port: u16, now: u64) -> Self {
        let name =
            name.unwrap_or_else(|| format!("peer-{}", id.chars().take(6).collect::<String>()));

        Self {
            id,
            name,
            ip,
            port,
            last_seen: now,
            status: PeerStatus::Online,
        }
    }
}
