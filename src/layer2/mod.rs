// Layer 2 - Aggregation & History
// Pure Rust - streaming aggregates, episode records and the rolling history

pub mod aggregator;
pub mod rolling_history;
pub mod episode;
pub mod episode_store;

// Re-export commonly used items
pub use aggregator::StreamingAggregator;
pub use rolling_history::RollingWindowHistory;
pub use episode::{Episode, OpenEpisode};
pub use episode_store::{EpisodeStore, EpisodeStoreStats};
