// Scripted Environment - In-memory Environment whose state the caller sets
// Used for replaying recorded drives and for tests

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::core::error::EnvError;
use crate::core::types::{TimeSinceSignal, Vec3, VehicleState};
use crate::layer1::environment::Environment;

/// How street snapping is answered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreetLayout {
    /// Every position snaps onto an infinite straight street through the
    /// origin running along `direction`
    Straight { direction: Vec3 },
    /// Positions are returned unchanged
    Anywhere,
}

#[derive(Debug, Clone)]
struct ScriptedState {
    vehicle: Option<VehicleState>,
    time_since: HashMap<TimeSinceSignal, i64>,
    damaged_nearby: bool,
    street: StreetLayout,
    outage: Option<String>,
}

impl Default for ScriptedState {
    fn default() -> Self {
        Self {
            vehicle: None,
            time_since: HashMap::new(),
            damaged_nearby: false,
            street: StreetLayout::Anywhere,
            outage: None,
        }
    }
}

/// Thread-safe scripted environment. Signals never set read as "never held".
#[derive(Debug, Default)]
pub struct ScriptedEnvironment {
    state: RwLock<ScriptedState>,
}

impl ScriptedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vehicle(&self, vehicle: Option<VehicleState>) {
        self.state.write().vehicle = vehicle;
    }

    /// Update the occupied vehicle in place; no-op while on foot
    pub fn update_vehicle(&self, update: impl FnOnce(&mut VehicleState)) {
        if let Some(vehicle) = self.state.write().vehicle.as_mut() {
            update(vehicle);
        }
    }

    pub fn set_time_since(&self, signal: TimeSinceSignal, ms: i64) {
        self.state.write().time_since.insert(signal, ms);
    }

    /// Mark `signal` as holding this step
    pub fn trigger(&self, signal: TimeSinceSignal) {
        self.set_time_since(signal, 0);
    }

    /// Age every signal that has held at least once by `delta_ms`
    pub fn age_signals(&self, delta_ms: i64) {
        for ms in self.state.write().time_since.values_mut() {
            if *ms >= 0 {
                *ms += delta_ms;
            }
        }
    }

    pub fn set_damaged_nearby(&self, damaged: bool) {
        self.state.write().damaged_nearby = damaged;
    }

    pub fn set_street_layout(&self, layout: StreetLayout) {
        self.state.write().street = layout;
    }

    /// Make every query fail until `clear_outage`
    pub fn set_outage(&self, reason: &str) {
        self.state.write().outage = Some(reason.to_string());
    }

    pub fn clear_outage(&self) {
        self.state.write().outage = None;
    }

    fn check_outage(state: &ScriptedState) -> Result<(), EnvError> {
        match &state.outage {
            Some(reason) => Err(EnvError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Environment for ScriptedEnvironment {
    fn player_vehicle(&self) -> Result<Option<VehicleState>, EnvError> {
        let state = self.state.read();
        Self::check_outage(&state)?;
        Ok(state.vehicle)
    }

    fn time_since(&self, signal: TimeSinceSignal) -> Result<i64, EnvError> {
        let state = self.state.read();
        Self::check_outage(&state)?;
        Ok(state.time_since.get(&signal).copied().unwrap_or(-1))
    }

    fn damaged_by_player_nearby(&self, _radius: f32) -> Result<bool, EnvError> {
        let state = self.state.read();
        Self::check_outage(&state)?;
        Ok(state.damaged_nearby)
    }

    fn street_position_near(&self, position: Vec3) -> Result<Vec3, EnvError> {
        let state = self.state.read();
        Self::check_outage(&state)?;
        match state.street {
            StreetLayout::Straight { direction } => {
                let dir = direction.normalized();
                Ok(dir * position.dot(dir))
            }
            StreetLayout::Anywhere => Ok(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let env = ScriptedEnvironment::new();
        assert_eq!(env.player_vehicle(), Ok(None));
        assert_eq!(env.time_since(TimeSinceSignal::HitVehicle), Ok(-1));
        assert_eq!(env.damaged_by_player_nearby(10.0), Ok(false));
    }

    #[test]
    fn test_trigger_and_age() {
        let env = ScriptedEnvironment::new();
        env.trigger(TimeSinceSignal::HitPedestrian);
        assert_eq!(env.time_since(TimeSinceSignal::HitPedestrian), Ok(0));

        env.age_signals(50);
        assert_eq!(env.time_since(TimeSinceSignal::HitPedestrian), Ok(50));
        // Never-held signals stay negative
        assert_eq!(env.time_since(TimeSinceSignal::HitVehicle), Ok(-1));
    }

    #[test]
    fn test_update_vehicle() {
        let env = ScriptedEnvironment::new();
        env.update_vehicle(|v| v.speed = 99.0);
        assert_eq!(env.player_vehicle(), Ok(None));

        env.set_vehicle(Some(VehicleState::default()));
        env.update_vehicle(|v| v.speed = 12.0);
        assert_eq!(env.player_vehicle().unwrap().unwrap().speed, 12.0);
    }

    #[test]
    fn test_straight_street_projection() {
        let env = ScriptedEnvironment::new();
        env.set_street_layout(StreetLayout::Straight { direction: Vec3::new(0.0, 2.0, 0.0) });

        let snapped = env.street_position_near(Vec3::new(3.0, 7.0, 0.0)).unwrap();
        assert!((snapped.x).abs() < 1e-6);
        assert!((snapped.y - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_outage() {
        let env = ScriptedEnvironment::new();
        env.set_outage("loading");
        assert!(matches!(env.player_vehicle(), Err(EnvError::Unavailable(_))));
        assert!(env.time_since(TimeSinceSignal::HitVehicle).is_err());

        env.clear_outage();
        assert!(env.player_vehicle().is_ok());
    }
}
