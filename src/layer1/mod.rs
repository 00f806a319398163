// Layer 1 - Environment Boundary
// Read-only access to the driving simulation, plus scripted stand-ins

pub mod environment;
pub mod scripted;
pub mod simulated;

// Re-export commonly used items
pub use environment::Environment;
pub use scripted::{ScriptedEnvironment, StreetLayout};
pub use simulated::SimulatedDrive;
