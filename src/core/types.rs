// Core Type Definitions for the Reward Hook
// Geometry and vehicle snapshots read from the driving environment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

// ============================================================================
// Geometry
// ============================================================================

/// World-space vector (meters, or meters per second for velocities)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; a zero-length vector stays zero.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ============================================================================
// Vehicle Snapshot
// ============================================================================

/// State of the vehicle the agent currently occupies, sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Scalar speed in m/s
    pub speed: f64,
    pub health: i32,
    pub max_health: i32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit vector the vehicle body points along
    pub forward: Vec3,
}

impl VehicleState {
    /// Heading that blends travel direction with body orientation.
    /// `velocity_weight` of 1.0 ignores the body, 0.0 ignores the velocity.
    pub fn heading(&self, velocity_weight: f32) -> Vec3 {
        (velocity_weight * self.velocity.normalized() + (1.0 - velocity_weight) * self.forward)
            .normalized()
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0.0,
            health: 1000,
            max_health: 1000,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            forward: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

// ============================================================================
// Environment Signals
// ============================================================================

/// Conditions the environment reports as "time since the player last did X"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSinceSignal {
    DroveAgainstTraffic,
    DroveOnPavement,
    HitPedestrian,
    HitVehicle,
}

impl TimeSinceSignal {
    pub const ALL: [TimeSinceSignal; 4] = [
        TimeSinceSignal::DroveAgainstTraffic,
        TimeSinceSignal::DroveOnPavement,
        TimeSinceSignal::HitPedestrian,
        TimeSinceSignal::HitVehicle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSinceSignal::DroveAgainstTraffic => "drove_against_traffic",
            TimeSinceSignal::DroveOnPavement => "drove_on_pavement",
            TimeSinceSignal::HitPedestrian => "hit_pedestrian",
            TimeSinceSignal::HitVehicle => "hit_vehicle",
        }
    }
}

impl fmt::Display for TimeSinceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert!((a.dot(b) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalized() {
        let v = Vec3::new(3.0, 0.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);

        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_heading_blend() {
        let vehicle = VehicleState {
            velocity: Vec3::new(10.0, 0.0, 0.0),
            forward: Vec3::new(1.0, 0.0, 0.0),
            ..VehicleState::default()
        };
        let heading = vehicle.heading(0.9);
        assert!((heading.x - 1.0).abs() < 1e-6);

        // Stationary vehicle falls back to body orientation
        let parked = VehicleState::default();
        let heading = parked.heading(0.9);
        assert!((heading.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_signal_serialization() {
        let json = serde_json::to_string(&TimeSinceSignal::HitVehicle).unwrap();
        assert_eq!(json, "\"hit_vehicle\"");
    }
}
