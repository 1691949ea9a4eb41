use crate::domain::Identity;
use std::{env, path::PathBuf};
use tokio::{fs, io};

pub const DEFAULT_DISCOVERY_PORT: u16 = 41234;

pub struct Config {
    pub identity: Identity,
    pub discovery_port: u16,
    pub peers_path: PathBuf,
}

impl Config {
    /// Reads the identity file and environment overrides. A missing or
    /// unreadable identity file is fatal: without a stable id and TCP port
    /// the node cannot participate at all.
    pub async fn load() -> io::Result<Self> {
        let identity_path = env_path("PARLEY_IDENTITY", "identity.json");

        let contents = fs::read_to_string(&identity_path).await.map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("cannot read identity file {}: {e}", identity_path.display()),
            )
        })?;
        let identity: Identity = serde_json::from_str(&contents).map_err(io::Error::other)?;

        let discovery_port = match env::var("PARLEY_UDP_PORT") {
            Ok(port) => port.parse().map_err(io::Error::other)?,
            Err(_) => DEFAULT_DISCOVERY_PORT,
        };

        Ok(Self {
            identity,
            discovery_port,
            peers_path: env_path("PARLEY_PEERS", "peers.json"),
        })
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
