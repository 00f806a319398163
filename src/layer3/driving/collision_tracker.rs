// Collision Tracker - Detects contact the dedicated signals miss
// Vehicle health drops and nearby entities damaged by the player

use tracing::debug;

use crate::core::error::EnvError;
use crate::core::events::DrivingEvent;
use crate::layer1::environment::Environment;
use crate::layer3::common::tracker::StatTracker;

pub const COLLISION_TRACKER: &str = "collision";

/// Reports `hit_other` when the vehicle lost health since the last drop, or
/// when anything within `radius_m` has been damaged by the player.
pub struct CollisionTracker {
    radius_m: f32,
    // Lowest health seen since the last reset; i32::MAX while unset
    last_health: i32,
    occurred: bool,

    // Statistics
    ticks_processed: u64,
    events_fired: u64,
}

impl CollisionTracker {
    pub fn new(radius_m: f32) -> Self {
        Self {
            radius_m,
            last_health: i32::MAX,
            occurred: false,
            ticks_processed: 0,
            events_fired: 0,
        }
    }

    pub fn health_baseline(&self) -> Option<i32> {
        (self.last_health != i32::MAX).then_some(self.last_health)
    }

    pub fn ticks_processed(&self) -> u64 {
        self.ticks_processed
    }

    pub fn events_fired(&self) -> u64 {
        self.events_fired
    }

    fn detect(&mut self, env: &dyn Environment) -> Result<bool, EnvError> {
        let vehicle = match env.player_vehicle()? {
            Some(vehicle) => vehicle,
            None => return Ok(false),
        };

        self.last_health = self.last_health.min(vehicle.max_health);
        if vehicle.health < self.last_health {
            self.last_health = vehicle.health;
            return Ok(true);
        }

        env.damaged_by_player_nearby(self.radius_m)
    }
}

impl StatTracker<DrivingEvent> for CollisionTracker {
    fn name(&self) -> &str {
        COLLISION_TRACKER
    }

    fn tick(&mut self, env: &dyn Environment) {
        self.ticks_processed += 1;
        self.occurred = self.detect(env).unwrap_or_else(|e| {
            debug!(tracker = COLLISION_TRACKER, error = %e, "Environment read failed");
            false
        });
        if self.occurred {
            self.events_fired += 1;
        }
    }

    fn value(&self) -> DrivingEvent {
        if self.occurred {
            DrivingEvent::HitOther
        } else {
            DrivingEvent::None
        }
    }

    fn reset_episode(&mut self, env: &dyn Environment) {
        self.last_health = match env.player_vehicle() {
            Ok(Some(vehicle)) => vehicle.health,
            Ok(None) => i32::MAX,
            Err(e) => {
                debug!(tracker = COLLISION_TRACKER, error = %e, "Baseline reseed failed");
                i32::MAX
            }
        };
        debug!(tracker = COLLISION_TRACKER, baseline = ?self.health_baseline(), "Tracker reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::VehicleState;
    use crate::layer1::scripted::ScriptedEnvironment;

    fn env_in_vehicle() -> ScriptedEnvironment {
        let env = ScriptedEnvironment::new();
        env.set_vehicle(Some(VehicleState::default()));
        env
    }

    #[test]
    fn test_health_drop() {
        let env = env_in_vehicle();
        let mut tracker = CollisionTracker::new(10.0);

        // Fresh baseline clamps to max health; a full-health car is quiet
        tracker.tick(&env);
        assert_eq!(tracker.value(), DrivingEvent::None);
        assert_eq!(tracker.health_baseline(), Some(1000));

        env.update_vehicle(|v| v.health = 900);
        tracker.tick(&env);
        assert_eq!(tracker.value(), DrivingEvent::HitOther);

        // Same health again is not a new hit
        tracker.tick(&env);
        assert_eq!(tracker.value(), DrivingEvent::None);
        assert_eq!(tracker.events_fired(), 1);
    }

    #[test]
    fn test_repair_does_not_raise_baseline() {
        let env = env_in_vehicle();
        let mut tracker = CollisionTracker::new(10.0);

        env.update_vehicle(|v| v.health = 800);
        tracker.tick(&env);
        env.update_vehicle(|v| v.health = 1000);
        tracker.tick(&env);
        env.update_vehicle(|v| v.health = 900);
        tracker.tick(&env);

        assert_eq!(tracker.value(), DrivingEvent::None);
        assert_eq!(tracker.health_baseline(), Some(800));
    }

    #[test]
    fn test_damaged_nearby() {
        let env = env_in_vehicle();
        let mut tracker = CollisionTracker::new(10.0);

        env.set_damaged_nearby(true);
        tracker.tick(&env);
        assert_eq!(tracker.value(), DrivingEvent::HitOther);

        // Only counted while in a vehicle
        env.set_vehicle(None);
        tracker.tick(&env);
        assert_eq!(tracker.value(), DrivingEvent::None);
    }

    #[test]
    fn test_reset_reseeds_baseline() {
        let env = env_in_vehicle();
        let mut tracker = CollisionTracker::new(10.0);

        env.update_vehicle(|v| v.health = 700);
        tracker.reset_episode(&env);
        assert_eq!(tracker.health_baseline(), Some(700));

        env.set_vehicle(None);
        tracker.reset_episode(&env);
        assert_eq!(tracker.health_baseline(), None);

        env.set_vehicle(Some(VehicleState::default()));
        env.set_outage("loading");
        tracker.reset_episode(&env);
        assert_eq!(tracker.health_baseline(), None);
    }

    #[test]
    fn test_read_failure_is_neutral() {
        let env = env_in_vehicle();
        let mut tracker = CollisionTracker::new(10.0);
        env.set_damaged_nearby(true);
        env.set_outage("loading");

        tracker.tick(&env);
        assert_eq!(tracker.value(), DrivingEvent::None);
    }
}
