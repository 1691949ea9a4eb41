use crate::{config::Config, domain::Identity};
use std::sync::Arc;

/// Immutable per-process state shared by the services.
pub struct AppState {
    pub identity: Identity,
}

impl AppState {
    pub fn new(config: &Config) -> Arc<Self> {
        Arc::new(Self {
            identity: config.identity.clone(),
        })
    }
}
