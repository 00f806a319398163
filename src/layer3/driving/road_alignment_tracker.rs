// Road Alignment Tracker - How well the vehicle follows the street
// 1.0 = heading along the street, 0.0 = heading across it

use tracing::debug;

use crate::core::error::EnvError;
use crate::core::types::VehicleState;
use crate::layer1::environment::Environment;
use crate::layer2::aggregator::StreamingAggregator;
use crate::layer3::common::tracker::StatTracker;

pub const AVG_ROAD_ALIGNMENT: &str = "avg_road_alignment";

/// Each tick in a vehicle, snaps the vehicle position and a point
/// `lookahead_m` ahead along its heading onto the street, and observes the
/// cosine between the street direction and the heading. The heading blends
/// velocity and body orientation by `velocity_weight`.
pub struct RoadAlignmentTracker {
    lookahead_m: f32,
    velocity_weight: f32,
    alignment: StreamingAggregator,
    ticks_processed: u64,
}

impl RoadAlignmentTracker {
    pub fn new(lookahead_m: f32, velocity_weight: f32) -> Self {
        Self {
            lookahead_m,
            velocity_weight,
            alignment: StreamingAggregator::new(),
            ticks_processed: 0,
        }
    }

    pub fn samples(&self) -> u64 {
        self.alignment.count()
    }

    pub fn ticks_processed(&self) -> u64 {
        self.ticks_processed
    }

    fn measure(&self, env: &dyn Environment, vehicle: &VehicleState) -> Result<f64, EnvError> {
        let heading = vehicle.heading(self.velocity_weight);
        let here = env.street_position_near(vehicle.position)?;
        let ahead = env.street_position_near(vehicle.position + heading * self.lookahead_m)?;
        Ok((ahead - here).normalized().dot(heading) as f64)
    }
}

impl StatTracker<f64> for RoadAlignmentTracker {
    fn name(&self) -> &str {
        AVG_ROAD_ALIGNMENT
    }

    fn tick(&mut self, env: &dyn Environment) {
        self.ticks_processed += 1;
        let sample = env
            .player_vehicle()
            .and_then(|vehicle| vehicle.map(|v| self.measure(env, &v)).transpose());

        match sample {
            Ok(Some(alignment)) => self.alignment.observe(alignment),
            Ok(None) => {}
            Err(e) => debug!(tracker = AVG_ROAD_ALIGNMENT, error = %e, "Environment read failed"),
        }
    }

    fn value(&self) -> f64 {
        self.alignment.value()
    }

    fn reset_episode(&mut self, _env: &dyn Environment) {
        self.alignment.reset();
    }
}
