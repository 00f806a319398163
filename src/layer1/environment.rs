// Environment Read Interface
// Narrow, read-only queries the trackers make against the live simulation

use crate::core::error::EnvError;
use crate::core::types::{TimeSinceSignal, Vec3, VehicleState};

/// Read-only view of the driving environment.
///
/// Every query answers for the current simulation step. A failed read is
/// transient; trackers treat it as "nothing observed this tick".
pub trait Environment: Send + Sync {
    /// Vehicle the agent occupies, or `None` while on foot
    fn player_vehicle(&self) -> Result<Option<VehicleState>, EnvError>;

    /// Milliseconds since `signal` last held. `0` means it holds this step,
    /// a negative value means it never has.
    fn time_since(&self, signal: TimeSinceSignal) -> Result<i64, EnvError>;

    /// Whether any entity within `radius` meters of the agent has been
    /// damaged by the agent
    fn damaged_by_player_nearby(&self, radius: f32) -> Result<bool, EnvError>;

    /// Closest point on a street to `position`
    fn street_position_near(&self, position: Vec3) -> Result<Vec3, EnvError>;
}
