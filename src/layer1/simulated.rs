// Simulated Drive - Deterministic driving script over a ScriptedEnvironment
// Feeds the demo binary when no live simulation is attached

use std::sync::Arc;
use tracing::debug;

use crate::core::types::{TimeSinceSignal, Vec3, VehicleState};
use crate::layer1::scripted::{ScriptedEnvironment, StreetLayout};

// Script phases, in simulated seconds within a repeating 90s loop
const LOOP_SECS: u64 = 90;
const PAVEMENT_SECS: (u64, u64) = (20, 23);
const VEHICLE_HIT_SEC: u64 = 35;
const WRONG_SIDE_SECS: (u64, u64) = (50, 54);
const ON_FOOT_SECS: (u64, u64) = (70, 75);

/// Drives a car up a straight north-south street with a gentle weave,
/// a pavement excursion, one vehicle hit, a stretch on the wrong side and a
/// short stop on foot, repeating every 90 simulated seconds.
pub struct SimulatedDrive {
    env: Arc<ScriptedEnvironment>,
    step_ms: i64,
    step: u64,
    vehicle: VehicleState,
}

impl SimulatedDrive {
    pub fn new(env: Arc<ScriptedEnvironment>, step_ms: i64) -> Self {
        let vehicle = VehicleState::default();
        env.set_street_layout(StreetLayout::Straight { direction: Vec3::new(0.0, 1.0, 0.0) });
        env.set_vehicle(Some(vehicle));

        Self {
            env,
            step_ms: step_ms.max(1),
            step: 0,
            vehicle,
        }
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    fn elapsed_ms(&self) -> i64 {
        self.step as i64 * self.step_ms
    }

    /// Advance the script by one step and publish the new state
    pub fn advance(&mut self) {
        self.step += 1;
        self.env.age_signals(self.step_ms);

        let elapsed_ms = self.elapsed_ms();
        let t = elapsed_ms as f32 / 1000.0;
        let loop_sec = (elapsed_ms / 1000) as u64 % LOOP_SECS;
        let dt = self.step_ms as f32 / 1000.0;

        if (ON_FOOT_SECS.0..ON_FOOT_SECS.1).contains(&loop_sec) {
            self.env.set_vehicle(None);
            return;
        }

        // Cruise between 5 and 25 m/s, weaving a few degrees around north
        let speed = 15.0 + 10.0 * (t / 8.0).sin();
        let weave = 0.15 * (t / 3.0).sin();
        let wrong_side = (WRONG_SIDE_SECS.0..WRONG_SIDE_SECS.1).contains(&loop_sec);
        let direction = if wrong_side {
            Vec3::new(weave.sin(), -weave.cos(), 0.0)
        } else {
            Vec3::new(weave.sin(), weave.cos(), 0.0)
        };

        self.vehicle.speed = speed as f64;
        self.vehicle.velocity = direction * speed;
        self.vehicle.forward = direction;
        self.vehicle.position = self.vehicle.position + self.vehicle.velocity * dt;

        if wrong_side {
            self.env.trigger(TimeSinceSignal::DroveAgainstTraffic);
        }
        if (PAVEMENT_SECS.0..PAVEMENT_SECS.1).contains(&loop_sec) {
            self.env.trigger(TimeSinceSignal::DroveOnPavement);
        }

        // One hit per loop, on the first step of that second
        let first_step_of_second = elapsed_ms % 1000 < self.step_ms;
        if loop_sec == VEHICLE_HIT_SEC && first_step_of_second {
            self.env.trigger(TimeSinceSignal::HitVehicle);
            self.vehicle.health = (self.vehicle.health - 50).max(0);
            debug!(step = self.step, health = self.vehicle.health, "Simulated vehicle hit");
        }

        // Repaired at the start of each loop
        if loop_sec == 0 && first_step_of_second {
            self.vehicle.health = self.vehicle.max_health;
        }

        self.env.set_vehicle(Some(self.vehicle));
    }
}
