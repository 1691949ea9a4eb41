use serde::Deserialize;

/// Who this node claims to be. Loaded once at startup and immutable for
/// the process lifetime. `id` is assumed unique on the LAN; nothing on the
/// wire enforces it.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub port: u16,
}
