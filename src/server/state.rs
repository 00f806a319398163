// Server State - Shared by every handler
// Holds only a read handle on the episode history

use std::sync::Arc;
use std::time::Instant;

use crate::layer2::episode_store::EpisodeStore;

#[derive(Clone)]
pub struct ServerState {
    pub store: EpisodeStore,
    /// Upper bound on `count` for the latest-episodes endpoint
    pub max_latest: usize,
    started: Arc<Instant>,
}

impl ServerState {
    pub fn new(store: EpisodeStore, max_latest: usize) -> Self {
        Self {
            store,
            max_latest: max_latest.max(1),
            started: Arc::new(Instant::now()),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
