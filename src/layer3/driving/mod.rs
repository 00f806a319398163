// Driving Trackers - Event and metric trackers plus the episode driver

pub mod time_since_tracker;
pub mod collision_tracker;
pub mod speed_tracker;
pub mod road_alignment_tracker;
pub mod episode_driver;

pub use time_since_tracker::TimeSinceEventTracker;
pub use collision_tracker::{CollisionTracker, COLLISION_TRACKER};
pub use speed_tracker::{SpeedTracker, AVG_SPEED};
pub use road_alignment_tracker::{RoadAlignmentTracker, AVG_ROAD_ALIGNMENT};
pub use episode_driver::{EpisodeDriver, DriverStats};
