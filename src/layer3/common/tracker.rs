// Tracker Contract - Per-tick observers feeding the episode driver
// Event trackers yield a DrivingEvent per tick, metric trackers a running mean

use crate::core::events::DrivingEvent;
use crate::layer1::environment::Environment;

/// Common `tick / value / reset_episode` contract.
///
/// `tick` is called exactly once per step and never fails: a tracker that
/// cannot read the environment reports its neutral value for that step.
/// `reset_episode` runs after the outgoing episode's values were captured and
/// before the next `tick`.
pub trait StatTracker<T>: Send {
    /// Stable name; metric trackers use it as the metric key
    fn name(&self) -> &str;

    fn tick(&mut self, env: &dyn Environment);

    fn value(&self) -> T;

    fn reset_episode(&mut self, env: &dyn Environment);
}

/// Reports at most one event per tick; `DrivingEvent::None` when nothing held
pub type BoxedEventTracker = Box<dyn StatTracker<DrivingEvent>>;

/// Reports the mean of its observations so far this episode
pub type BoxedMetricTracker = Box<dyn StatTracker<f64>>;
