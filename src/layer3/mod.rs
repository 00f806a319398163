// Layer 3 - Trackers & Episode Driver
// Turns per-tick environment reads into episode events and metrics

// Common tracker contract
pub mod common;

// Driving trackers - 5 event trackers, 2 metric trackers
pub mod driving;

pub use common::{StatTracker, BoxedEventTracker, BoxedMetricTracker};
pub use driving::{
    EpisodeDriver, DriverStats,
    TimeSinceEventTracker, CollisionTracker, SpeedTracker, RoadAlignmentTracker,
};
