// Speed Tracker - Mean vehicle speed over the episode
// Any tick on foot discards the samples gathered so far

use tracing::debug;

use crate::layer1::environment::Environment;
use crate::layer2::aggregator::StreamingAggregator;
use crate::layer3::common::tracker::StatTracker;

pub const AVG_SPEED: &str = "avg_speed";

pub struct SpeedTracker {
    speed: StreamingAggregator,
    ticks_processed: u64,
}

impl SpeedTracker {
    pub fn new() -> Self {
        Self {
            speed: StreamingAggregator::new(),
            ticks_processed: 0,
        }
    }

    pub fn samples(&self) -> u64 {
        self.speed.count()
    }

    pub fn ticks_processed(&self) -> u64 {
        self.ticks_processed
    }
}

impl Default for SpeedTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTracker<f64> for SpeedTracker {
    fn name(&self) -> &str {
        AVG_SPEED
    }

    fn tick(&mut self, env: &dyn Environment) {
        self.ticks_processed += 1;
        match env.player_vehicle() {
            Ok(Some(vehicle)) => self.speed.observe(vehicle.speed),
            Ok(None) => self.speed.reset(),
            Err(e) => debug!(tracker = AVG_SPEED, error = %e, "Environment read failed"),
        }
    }

    fn value(&self) -> f64 {
        self.speed.value()
    }

    fn reset_episode(&mut self, _env: &dyn Environment) {
        self.speed.reset();
    }
}
